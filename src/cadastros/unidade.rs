use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validacao::{contem, email_valido, obrigatorio, opcional};
use super::{ordenar, paginar, Consulta, OrdemCadastro, Pagina};
use crate::error::{RhError, RhResult};
use crate::store::Dados;

/// Unidade física da empresa (matriz, filial, escritório, fábrica).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unidade {
    pub id: String,
    pub codigo: String,
    pub nome: String,
    pub tipo: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUnidade {
    pub codigo: String,
    pub nome: String,
    pub tipo: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub ativo: Option<bool>,
}

impl Unidade {
    /// Endereço em uma linha, com as partes presentes.
    pub fn endereco(&self) -> String {
        let rua = match (&self.logradouro, &self.numero) {
            (Some(l), Some(n)) => Some(format!("{l}, {n}")),
            (Some(l), None) => Some(l.clone()),
            _ => None,
        };
        let cidade = match (&self.cidade, &self.estado) {
            (Some(c), Some(uf)) => Some(format!("{c}/{uf}")),
            (Some(c), None) => Some(c.clone()),
            (None, Some(uf)) => Some(uf.clone()),
            (None, None) => None,
        };
        [rua, self.bairro.clone(), cidade]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" - ")
    }

    fn aplicar(&mut self, form: FormUnidade) -> RhResult<()> {
        let email = opcional(form.email);
        if let Some(e) = &email
            && !email_valido(e)
        {
            return Err(RhError::validacao("E-mail inválido"));
        }
        let estado = opcional(form.estado).map(|uf| uf.to_uppercase());
        if let Some(uf) = &estado
            && uf.chars().count() != 2
        {
            return Err(RhError::validacao("UF deve ter 2 letras"));
        }

        self.codigo = obrigatorio(&form.codigo, 1, "Código é obrigatório")?;
        self.nome = obrigatorio(&form.nome, 2, "Nome é obrigatório")?;
        self.tipo = opcional(form.tipo);
        self.cep = opcional(form.cep);
        self.logradouro = opcional(form.logradouro);
        self.numero = opcional(form.numero);
        self.complemento = opcional(form.complemento);
        self.bairro = opcional(form.bairro);
        self.cidade = opcional(form.cidade);
        self.estado = estado;
        self.telefone = opcional(form.telefone);
        self.email = email;
        self.ativo = form.ativo.unwrap_or(true);
        Ok(())
    }
}

fn checar_codigo(dados: &Dados, codigo: &str, proprio_id: Option<&str>) -> RhResult<()> {
    let codigo = codigo.trim();
    if dados
        .unidades
        .iter()
        .any(|u| u.codigo == codigo && Some(u.id.as_str()) != proprio_id)
    {
        return Err(RhError::Duplicado {
            entidade: "unidade",
            campo: "código",
            valor: codigo.to_string(),
        });
    }
    Ok(())
}

pub fn criar(dados: &mut Dados, form: FormUnidade) -> RhResult<Unidade> {
    checar_codigo(dados, &form.codigo, None)?;
    let now = Utc::now();
    let mut unidade = Unidade {
        id: Uuid::new_v4().to_string(),
        codigo: String::new(),
        nome: String::new(),
        tipo: None,
        cep: None,
        logradouro: None,
        numero: None,
        complemento: None,
        bairro: None,
        cidade: None,
        estado: None,
        telefone: None,
        email: None,
        ativo: true,
        created_at: now,
        updated_at: now,
    };
    unidade.aplicar(form)?;
    dados.unidades.push(unidade.clone());
    Ok(unidade)
}

pub fn atualizar(dados: &mut Dados, id: &str, form: FormUnidade) -> RhResult<Unidade> {
    checar_codigo(dados, &form.codigo, Some(id))?;
    let unidade = dados.unidade_mut(id)?;
    let mut editada = unidade.clone();
    editada.aplicar(form)?;
    editada.updated_at = Utc::now();
    *unidade = editada.clone();
    Ok(editada)
}

pub fn desativar(dados: &mut Dados, id: &str) -> RhResult<Unidade> {
    let u = dados.unidade_mut(id)?;
    u.ativo = false;
    u.updated_at = Utc::now();
    Ok(u.clone())
}

/// Lista unidades buscando por código, nome ou cidade.
pub fn listar(dados: &Dados, consulta: &Consulta) -> RhResult<Pagina<Unidade>> {
    let termo = consulta.termo();
    let mut itens: Vec<Unidade> = dados
        .unidades
        .iter()
        .filter(|u| {
            termo.is_empty()
                || contem(&u.codigo, &termo)
                || contem(&u.nome, &termo)
                || u.cidade.as_deref().is_some_and(|c| contem(c, &termo))
        })
        .filter(|u| consulta.ativo.is_none_or(|a| u.ativo == a))
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
