//! Erros do cliente WebDAV.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NextcloudError {
    /// Status HTTP inesperado para a operação.
    #[error("WebDAV {operacao} {caminho} falhou (status {status}): {message}")]
    Api {
        operacao: &'static str,
        caminho: String,
        status: u16,
        message: String,
    },

    #[error("arquivo não encontrado: {0}")]
    NaoEncontrado(String),

    #[error("falha ao criar diretório: {0}")]
    Diretorio(String),

    #[error("falha de rede: {0}")]
    Rede(#[from] reqwest::Error),
}
