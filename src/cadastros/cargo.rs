use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validacao::{contem, obrigatorio, opcional, Dinheiro};
use super::{ordenar, paginar, Consulta, OrdemCadastro, Pagina};
use crate::error::{RhError, RhResult};
use crate::store::Dados;

/// Níveis de carreira aceitos.
pub const NIVEIS: &[&str] = &["Júnior", "Pleno", "Sênior", "Especialista", "Gerente", "Diretor"];

/// Cargo com faixa salarial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cargo {
    pub id: String,
    pub codigo: String,
    pub titulo: String,
    pub descricao: Option<String>,
    pub nivel: Option<String>,
    /// Código Brasileiro de Ocupações.
    pub cbo: Option<String>,
    pub salario_minimo: Option<Dinheiro>,
    pub salario_maximo: Option<Dinheiro>,
    pub escolaridade_minima: Option<String>,
    pub experiencia_minima_anos: Option<u32>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Formulário de cargo. Salários chegam como texto livre (`"R$ 4.500,00"`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormCargo {
    pub codigo: String,
    pub titulo: String,
    pub descricao: Option<String>,
    pub nivel: Option<String>,
    pub cbo: Option<String>,
    pub salario_minimo: Option<String>,
    pub salario_maximo: Option<String>,
    pub escolaridade_minima: Option<String>,
    pub experiencia_minima_anos: Option<String>,
    pub ativo: Option<bool>,
}

impl Cargo {
    /// Faixa salarial formatada, quando houver.
    pub fn faixa_salarial(&self) -> Option<String> {
        match (self.salario_minimo, self.salario_maximo) {
            (Some(min), Some(max)) => Some(format!("{min} a {max}")),
            (Some(min), None) => Some(format!("a partir de {min}")),
            (None, Some(max)) => Some(format!("até {max}")),
            (None, None) => None,
        }
    }

    fn aplicar(&mut self, form: FormCargo) -> RhResult<()> {
        let nivel = opcional(form.nivel);
        if let Some(n) = &nivel
            && !NIVEIS.contains(&n.as_str())
        {
            return Err(RhError::validacao(format!(
                "Nível inválido: {n}. Use um de: {}",
                NIVEIS.join(", ")
            )));
        }

        let salario_minimo = Dinheiro::parse_opcional(form.salario_minimo.as_deref());
        let salario_maximo = Dinheiro::parse_opcional(form.salario_maximo.as_deref());
        if let (Some(min), Some(max)) = (salario_minimo, salario_maximo)
            && min > max
        {
            return Err(RhError::validacao(
                "Salário mínimo não pode ser maior que o salário máximo",
            ));
        }

        let experiencia_minima_anos = match opcional(form.experiencia_minima_anos) {
            Some(t) => Some(t.parse::<u32>().map_err(|_| {
                RhError::validacao(format!("Experiência mínima inválida: {t}"))
            })?),
            None => None,
        };

        self.codigo = obrigatorio(&form.codigo, 1, "Código é obrigatório")?;
        self.titulo = obrigatorio(&form.titulo, 2, "Título é obrigatório")?;
        self.descricao = opcional(form.descricao);
        self.nivel = nivel;
        self.cbo = opcional(form.cbo);
        self.salario_minimo = salario_minimo;
        self.salario_maximo = salario_maximo;
        self.escolaridade_minima = opcional(form.escolaridade_minima);
        self.experiencia_minima_anos = experiencia_minima_anos;
        self.ativo = form.ativo.unwrap_or(true);
        Ok(())
    }
}

fn checar_codigo(dados: &Dados, codigo: &str, proprio_id: Option<&str>) -> RhResult<()> {
    let codigo = codigo.trim();
    if dados
        .cargos
        .iter()
        .any(|c| c.codigo == codigo && Some(c.id.as_str()) != proprio_id)
    {
        return Err(RhError::Duplicado {
            entidade: "cargo",
            campo: "código",
            valor: codigo.to_string(),
        });
    }
    Ok(())
}

pub fn criar(dados: &mut Dados, form: FormCargo) -> RhResult<Cargo> {
    checar_codigo(dados, &form.codigo, None)?;
    let now = Utc::now();
    let mut cargo = Cargo {
        id: Uuid::new_v4().to_string(),
        codigo: String::new(),
        titulo: String::new(),
        descricao: None,
        nivel: None,
        cbo: None,
        salario_minimo: None,
        salario_maximo: None,
        escolaridade_minima: None,
        experiencia_minima_anos: None,
        ativo: true,
        created_at: now,
        updated_at: now,
    };
    cargo.aplicar(form)?;
    dados.cargos.push(cargo.clone());
    Ok(cargo)
}

pub fn atualizar(dados: &mut Dados, id: &str, form: FormCargo) -> RhResult<Cargo> {
    checar_codigo(dados, &form.codigo, Some(id))?;
    let cargo = dados.cargo_mut(id)?;
    let mut editado = cargo.clone();
    editado.aplicar(form)?;
    editado.updated_at = Utc::now();
    *cargo = editado.clone();
    Ok(editado)
}

pub fn desativar(dados: &mut Dados, id: &str) -> RhResult<Cargo> {
    let c = dados.cargo_mut(id)?;
    c.ativo = false;
    c.updated_at = Utc::now();
    Ok(c.clone())
}

/// Lista cargos buscando por código ou título.
pub fn listar(dados: &Dados, consulta: &Consulta) -> RhResult<Pagina<Cargo>> {
    let termo = consulta.termo();
    let mut itens: Vec<Cargo> = dados
        .cargos
        .iter()
        .filter(|c| termo.is_empty() || contem(&c.codigo, &termo) || contem(&c.titulo, &termo))
        .filter(|c| consulta.ativo.is_none_or(|a| c.ativo == a))
        .cloned()
        .collect();

    itens.sort_by(|a, b| {
        let ordem = match consulta.ordem {
            OrdemCadastro::Codigo => a.codigo.cmp(&b.codigo),
            OrdemCadastro::Nome => a.titulo.to_lowercase().cmp(&b.titulo.to_lowercase()),
            OrdemCadastro::Criacao => a.created_at.cmp(&b.created_at),
        };
        ordenar(ordem, consulta.direcao)
    });

    paginar(itens, consulta.pagina, consulta.limite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(codigo: &str) -> FormCargo {
        FormCargo {
            codigo: codigo.into(),
            titulo: "Analista de Sistemas".into(),
            nivel: Some("Pleno".into()),
            salario_minimo: Some("R$ 4.500,00".into()),
            salario_maximo: Some("7.200,50".into()),
            experiencia_minima_anos: Some("2".into()),
            ..Default::default()
        }
    }

    #[test]
    fn criar_parses_salary_band() {
        let mut dados = Dados::default();
        let c = criar(&mut dados, form("AS-PL")).unwrap();
        assert_eq!(c.salario_minimo, Some(Dinheiro(450_000)));
        assert_eq!(c.salario_maximo, Some(Dinheiro(720_050)));
        assert_eq!(c.experiencia_minima_anos, Some(2));
        assert_eq!(
            c.faixa_salarial().unwrap(),
            "R$ 4.500,00 a R$ 7.200,50"
        );
    }

    #[test]
    fn unparsable_salary_is_dropped() {
        let mut dados = Dados::default();
        let mut f = form("X");
        f.salario_minimo = Some("a combinar".into());
        let c = criar(&mut dados, f).unwrap();
        assert!(c.salario_minimo.is_none());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut dados = Dados::default();
        let mut f = form("X");
        f.salario_minimo = Some("9000".into());
        assert!(matches!(criar(&mut dados, f), Err(RhError::Validacao(_))));
        assert!(dados.cargos.is_empty());
    }

    #[test]
    fn unknown_level_is_rejected() {
        let mut dados = Dados::default();
        let mut f = form("X");
        f.nivel = Some("Estagiário Sênior".into());
        assert!(criar(&mut dados, f).is_err());
    }

    #[test]
    fn duplicate_code_on_update() {
        let mut dados = Dados::default();
        criar(&mut dados, form("A")).unwrap();
        let b = criar(&mut dados, form("B")).unwrap();
        let err = atualizar(&mut dados, &b.id, form("A")).unwrap_err();
        assert!(matches!(err, RhError::Duplicado { .. }));
        // Failed update leaves the record untouched.
        assert_eq!(dados.cargo(&b.id).unwrap().codigo, "B");
    }

    #[test]
    fn desativar_marks_inactive() {
        let mut dados = Dados::default();
        let c = criar(&mut dados, form("A")).unwrap();
        let c = desativar(&mut dados, &c.id).unwrap();
        assert!(!c.ativo);
    }
}
