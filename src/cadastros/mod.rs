//! Cadastros básicos: colaboradores, departamentos, cargos e unidades.
//!
//! Cada submódulo define a entidade, o formulário de entrada com suas regras
//! de validação e as operações sobre [`Dados`](crate::store::Dados).

pub mod cargo;
pub mod colaborador;
pub mod departamento;
pub mod unidade;
pub mod validacao;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{RhError, RhResult};

pub use cargo::Cargo;
pub use colaborador::Colaborador;
pub use departamento::Departamento;
pub use unidade::Unidade;

/// Direção de ordenação das listagens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direcao {
    Asc,
    #[default]
    Desc,
}

/// Campo de ordenação de departamentos, cargos e unidades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrdemCadastro {
    Codigo,
    Nome,
    #[default]
    Criacao,
}

/// Parâmetros comuns de listagem.
#[derive(Debug, Clone)]
pub struct Consulta {
    /// Termo de busca; vazio não filtra.
    pub busca: String,
    /// `Some(true)` só ativos, `Some(false)` só inativos.
    pub ativo: Option<bool>,
    pub ordem: OrdemCadastro,
    pub pagina: usize,
    pub limite: usize,
    pub direcao: Direcao,
}

impl Default for Consulta {
    fn default() -> Self {
        Self {
            busca: String::new(),
            ativo: None,
            ordem: OrdemCadastro::Criacao,
            pagina: 1,
            limite: 10,
            direcao: Direcao::Desc,
        }
    }
}

impl Consulta {
    pub(crate) fn termo(&self) -> String {
        self.busca.trim().to_lowercase()
    }
}

/// Uma página de resultados com os dados de paginação.
#[derive(Debug, Clone, Serialize)]
pub struct Pagina<T> {
    pub itens: Vec<T>,
    pub pagina: usize,
    pub limite: usize,
    pub total: usize,
    pub total_paginas: usize,
}

/// Recorta `itens` (já filtrados e ordenados) na página pedida.
pub fn paginar<T>(itens: Vec<T>, pagina: usize, limite: usize) -> RhResult<Pagina<T>> {
    if pagina == 0 {
        return Err(RhError::validacao("Página deve ser maior ou igual a 1"));
    }
    if limite == 0 {
        return Err(RhError::validacao("Limite deve ser maior que zero"));
    }

    let total = itens.len();
    let itens = itens
        .into_iter()
        .skip((pagina - 1).saturating_mul(limite))
        .take(limite)
        .collect();

    Ok(Pagina {
        itens,
        pagina,
        limite,
        total,
        total_paginas: total.div_ceil(limite),
    })
}

/// Aplica a direção a uma comparação ascendente.
pub(crate) fn ordenar(ordem: std::cmp::Ordering, direcao: Direcao) -> std::cmp::Ordering {
    match direcao {
        Direcao::Asc => ordem,
        Direcao::Desc => ordem.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginar_second_page() {
        let p = paginar((1..=25).collect::<Vec<_>>(), 2, 10).unwrap();
        assert_eq!(p.itens, (11..=20).collect::<Vec<_>>());
        assert_eq!(p.total, 25);
        assert_eq!(p.total_paginas, 3);
    }

    #[test]
    fn paginar_past_end_is_empty() {
        let p = paginar(vec![1, 2, 3], 5, 10).unwrap();
        assert!(p.itens.is_empty());
        assert_eq!(p.total_paginas, 1);
    }

    #[test]
    fn paginar_rejects_zero() {
        assert!(paginar(vec![1], 0, 10).is_err());
        assert!(paginar(vec![1], 1, 0).is_err());
    }

    #[test]
    fn paginar_empty_has_zero_pages() {
        let p = paginar(Vec::<u8>::new(), 1, 10).unwrap();
        assert_eq!(p.total_paginas, 0);
    }
}
