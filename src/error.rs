//! Erros de domínio do rhponto.
//!
//! [`RhError`] cobre validação de entrada, registros inexistentes, chaves
//! únicas duplicadas e transições de status inválidas, além dos erros de
//! infraestrutura (IO, JSON, TOML e os clientes HTTP).

use thiserror::Error;

use crate::facial::FacialError;
use crate::nextcloud::NextcloudError;

#[derive(Debug, Error)]
pub enum RhError {
    #[error("{0}")]
    Validacao(String),

    #[error("{entidade} não encontrado: {id}")]
    NaoEncontrado { entidade: &'static str, id: String },

    #[error("Já existe um {entidade} com este {campo} cadastrado: {valor}")]
    Duplicado {
        entidade: &'static str,
        campo: &'static str,
        valor: String,
    },

    #[error("Transição inválida: {0}")]
    TransicaoInvalida(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Reconhecimento facial: {0}")]
    Facial(#[from] FacialError),

    #[error("Nextcloud: {0}")]
    Nextcloud(#[from] NextcloudError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RhError {
    pub fn validacao(msg: impl Into<String>) -> Self {
        RhError::Validacao(msg.into())
    }

    pub fn nao_encontrado(entidade: &'static str, id: impl Into<String>) -> Self {
        RhError::NaoEncontrado {
            entidade,
            id: id.into(),
        }
    }
}

pub type RhResult<T> = Result<T, RhError>;
