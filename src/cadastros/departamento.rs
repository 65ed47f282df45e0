use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validacao::{contem, obrigatorio, opcional};
use super::{ordenar, paginar, Consulta, OrdemCadastro, Pagina};
use crate::error::{RhError, RhResult};
use crate::store::Dados;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Departamento {
    pub id: String,
    pub codigo: String,
    pub nome: String,
    pub descricao: Option<String>,
    pub departamento_pai_id: Option<String>,
    pub gestor_id: Option<String>,
    pub centro_custo: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos editáveis de um departamento.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormDepartamento {
    pub codigo: String,
    pub nome: String,
    pub descricao: Option<String>,
    pub departamento_pai_id: Option<String>,
    pub gestor_id: Option<String>,
    pub centro_custo: Option<String>,
    pub ativo: Option<bool>,
}

struct Validado {
    codigo: String,
    nome: String,
    descricao: Option<String>,
    departamento_pai_id: Option<String>,
    gestor_id: Option<String>,
    centro_custo: Option<String>,
    ativo: bool,
}

fn validar(dados: &Dados, form: FormDepartamento, proprio_id: Option<&str>) -> RhResult<Validado> {
    let codigo = obrigatorio(&form.codigo, 1, "Código é obrigatório")?;
    let nome = obrigatorio(&form.nome, 2, "Nome é obrigatório")?;

    if dados
        .departamentos
        .iter()
        .any(|d| d.codigo == codigo && Some(d.id.as_str()) != proprio_id)
    {
        return Err(RhError::Duplicado {
            entidade: "departamento",
            campo: "código",
            valor: codigo,
        });
    }

    let departamento_pai_id = opcional(form.departamento_pai_id);
    if let Some(pai_id) = &departamento_pai_id {
        if Some(pai_id.as_str()) == proprio_id {
            return Err(RhError::validacao("Um departamento não pode ser pai de si mesmo."));
        }
        let pai = dados
            .departamento(pai_id)
            .map_err(|_| RhError::validacao("Departamento pai não encontrado."))?;
        if let Some(id) = proprio_id {
            verificar_ciclo(dados, pai, id)?;
        }
    }

    let gestor_id = opcional(form.gestor_id);
    if let Some(g) = &gestor_id {
        dados.colaborador(g)?;
    }

    Ok(Validado {
        codigo,
        nome,
        descricao: opcional(form.descricao),
        departamento_pai_id,
        gestor_id,
        centro_custo: opcional(form.centro_custo),
        ativo: form.ativo.unwrap_or(true),
    })
}

// Sobe a cadeia de pais a partir de `pai`; encontrar `id` significa que o novo
// pai é descendente do departamento editado.
fn verificar_ciclo(dados: &Dados, pai: &Departamento, id: &str) -> RhResult<()> {
    let mut vistos = HashSet::new();
    let mut atual = pai.departamento_pai_id.clone();
    while let Some(cur) = atual {
        if cur == id {
            return Err(RhError::validacao(
                "Referência circular detectada. O departamento pai não pode ser filho deste departamento.",
            ));
        }
        if !vistos.insert(cur.clone()) {
            break;
        }
        atual = dados
            .departamentos
            .iter()
            .find(|d| d.id == cur)
            .and_then(|d| d.departamento_pai_id.clone());
    }
    Ok(())
}

pub fn criar(dados: &mut Dados, form: FormDepartamento) -> RhResult<Departamento> {
    let v = validar(dados, form, None)?;
    let now = Utc::now();
    let departamento = Departamento {
        id: Uuid::new_v4().to_string(),
        codigo: v.codigo,
        nome: v.nome,
        descricao: v.descricao,
        departamento_pai_id: v.departamento_pai_id,
        gestor_id: v.gestor_id,
        centro_custo: v.centro_custo,
        ativo: v.ativo,
        created_at: now,
        updated_at: now,
    };
    dados.departamentos.push(departamento.clone());
    Ok(departamento)
}

pub fn atualizar(dados: &mut Dados, id: &str, form: FormDepartamento) -> RhResult<Departamento> {
    dados.departamento(id)?;
    let v = validar(dados, form, Some(id))?;
    let d = dados.departamento_mut(id)?;
    d.codigo = v.codigo;
    d.nome = v.nome;
    d.descricao = v.descricao;
    d.departamento_pai_id = v.departamento_pai_id;
    d.gestor_id = v.gestor_id;
    d.centro_custo = v.centro_custo;
    d.ativo = v.ativo;
    d.updated_at = Utc::now();
    Ok(d.clone())
}

pub fn desativar(dados: &mut Dados, id: &str) -> RhResult<Departamento> {
    let d = dados.departamento_mut(id)?;
    d.ativo = false;
    d.updated_at = Utc::now();
    Ok(d.clone())
}

/// Lista departamentos, buscando por código ou nome e opcionalmente filtrando
/// pelo departamento pai.
pub fn listar(
    dados: &Dados,
    consulta: &Consulta,
    departamento_pai_id: Option<&str>,
) -> RhResult<Pagina<Departamento>> {
    let termo = consulta.termo();
    let mut itens: Vec<Departamento> = dados
        .departamentos
        .iter()
        .filter(|d| termo.is_empty() || contem(&d.codigo, &termo) || contem(&d.nome, &termo))
        .filter(|d| consulta.ativo.is_none_or(|a| d.ativo == a))
        .filter(|d| departamento_pai_id.is_none_or(|p| d.departamento_pai_id.as_deref() == Some(p)))
        .cloned()
        .collect();

    itens.sort_by(|a, b| {
        let ordem = match consulta.ordem {
            OrdemCadastro::Codigo => a.codigo.cmp(&b.codigo),
            OrdemCadastro::Nome => a.nome.to_lowercase().cmp(&b.nome.to_lowercase()),
            OrdemCadastro::Criacao => a.created_at.cmp(&b.created_at),
        };
        ordenar(ordem, consulta.direcao)
    });

    paginar(itens, consulta.pagina, consulta.limite)
}
