//! Erros do cliente do serviço de reconhecimento facial.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacialError {
    /// O serviço respondeu com status HTTP de erro.
    #[error("erro no serviço de reconhecimento (status {status}): {message}")]
    Api { status: u16, message: String },

    /// O serviço processou a imagem mas recusou o pedido (`success: false`),
    /// por exemplo quando nenhum rosto corresponde aos candidatos.
    #[error("{0}")]
    Recusado(String),

    /// Resposta de sucesso sem os campos esperados.
    #[error("resposta inválida do serviço de reconhecimento: {0}")]
    RespostaInvalida(String),

    #[error("falha de rede: {0}")]
    Rede(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = FacialError::Api {
            status: 503,
            message: "modelo carregando".into(),
        };
        assert_eq!(
            err.to_string(),
            "erro no serviço de reconhecimento (status 503): modelo carregando"
        );
    }

    #[test]
    fn recusado_shows_service_message() {
        let err = FacialError::Recusado("Colaborador não reconhecido".into());
        assert_eq!(err.to_string(), "Colaborador não reconhecido");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FacialError>();
    }
}
