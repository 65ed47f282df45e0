//! Validadores e conversões compartilhados pelos cadastros.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RhError, RhResult};

/// Valor monetário em centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dinheiro(pub i64);

impl Dinheiro {
    /// Converte textos como `"R$ 1.234,56"`, `"1234.5"` ou `"3000"`.
    ///
    /// Com vírgula presente, pontos são separadores de milhar. Sem vírgula, um
    /// único ponto seguido de uma ou duas casas é o separador decimal. Retorna `None` para textos sem
    /// dígitos, negativos ou com mais de duas casas decimais.
    pub fn parse(texto: &str) -> Option<Self> {
        let limpo: String = texto
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
            .collect();
        if limpo.is_empty() || limpo.contains('-') {
            return None;
        }

        let so_milhar = limpo.matches('.').count() > 1
            || limpo.rsplit_once('.').is_some_and(|(_, f)| f.len() == 3);
        let normalizado = if limpo.contains(',') {
            limpo.replace('.', "").replacen(',', ".", 1)
        } else if so_milhar {
            limpo.replace('.', "")
        } else {
            limpo
        };

        let (inteiro, fracao) = match normalizado.rsplit_once('.') {
            Some((i, f)) => (i.replace('.', ""), f.to_string()),
            None => (normalizado, String::new()),
        };
        if fracao.len() > 2 || fracao.contains(',') || (inteiro.is_empty() && fracao.is_empty()) {
            return None;
        }

        let reais: i64 = if inteiro.is_empty() { 0 } else { inteiro.parse().ok()? };
        let centavos: i64 = match fracao.len() {
            0 => 0,
            1 => fracao.parse::<i64>().ok()? * 10,
            _ => fracao.parse().ok()?,
        };
        reais.checked_mul(100)?.checked_add(centavos).map(Dinheiro)
    }

    /// Converte um campo opcional; texto vazio vira `None`.
    pub fn parse_opcional(texto: Option<&str>) -> Option<Self> {
        texto.filter(|t| !t.trim().is_empty()).and_then(Self::parse)
    }
}

impl fmt::Display for Dinheiro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reais = (self.0 / 100).to_string();
        let mut milhar = String::new();
        for (i, c) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                milhar.push('.');
            }
            milhar.push(c);
        }
        write!(f, "R$ {milhar},{:02}", self.0 % 100)
    }
}

/// Normaliza um campo opcional: espaços nas pontas removidos, vazio vira `None`.
pub fn opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Campo obrigatório com tamanho mínimo (em caracteres, após `trim`).
pub fn obrigatorio(valor: &str, minimo: usize, mensagem: &str) -> RhResult<String> {
    let v = valor.trim();
    if v.chars().count() < minimo.max(1) {
        return Err(RhError::validacao(mensagem));
    }
    Ok(v.to_string())
}

/// Validação simples de e-mail: uma arroba, parte local e domínio com ponto.
pub fn email_valido(email: &str) -> bool {
    let Some((local, dominio)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !dominio.contains('@')
        && !email.chars().any(char::is_whitespace)
        && dominio
            .split_once('.')
            .is_some_and(|(a, b)| !a.is_empty() && !b.is_empty() && !b.ends_with('.'))
}

/// Quantidade de dígitos em um documento formatado (CPF, CEP, telefone).
pub fn digitos(valor: &str) -> usize {
    valor.chars().filter(char::is_ascii_digit).count()
}

/// Busca sem diferenciar maiúsculas de minúsculas.
pub fn contem(campo: &str, termo_minusculo: &str) -> bool {
    campo.to_lowercase().contains(termo_minusculo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dinheiro_parses_brazilian_format() {
        assert_eq!(Dinheiro::parse("R$ 1.234,56"), Some(Dinheiro(123_456)));
        assert_eq!(Dinheiro::parse("3.500"), Some(Dinheiro(350_000)));
        assert_eq!(Dinheiro::parse("2500,5"), Some(Dinheiro(250_050)));
        assert_eq!(Dinheiro::parse("1,234.56"), None);
        assert_eq!(Dinheiro::parse("abc"), None);
        assert_eq!(Dinheiro::parse("-100"), None);
    }

    #[test]
    fn dinheiro_parses_dot_decimal() {
        assert_eq!(Dinheiro::parse("1234.5"), Some(Dinheiro(123_450)));
        assert_eq!(Dinheiro::parse("3000"), Some(Dinheiro(300_000)));
    }

    #[test]
    fn dinheiro_display() {
        assert_eq!(Dinheiro(123_456).to_string(), "R$ 1.234,56");
        assert_eq!(Dinheiro(5).to_string(), "R$ 0,05");
        assert_eq!(Dinheiro(100_000_000).to_string(), "R$ 1.000.000,00");
    }

    #[test]
    fn opcional_trims_and_drops_empty() {
        assert_eq!(opcional(Some("  x ".into())), Some("x".into()));
        assert_eq!(opcional(Some("   ".into())), None);
        assert_eq!(opcional(None), None);
    }

    #[test]
    fn email_checks() {
        assert!(email_valido("ana@empresa.com.br"));
        assert!(!email_valido("ana@empresa"));
        assert!(!email_valido("ana empresa@x.com"));
        assert!(!email_valido("@x.com"));
        assert!(!email_valido("a@@x.com"));
    }

    #[test]
    fn obrigatorio_min_len() {
        assert!(obrigatorio(" a ", 2, "curto").is_err());
        assert_eq!(obrigatorio(" ab ", 2, "curto").unwrap(), "ab");
    }
}
