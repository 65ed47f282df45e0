//! Time clock core: punches, next-punch determination and attendance summaries.

mod marcacao;
mod registro;
mod resumo;
mod tipo;

pub use marcacao::{MarcacaoPonto, MetodoMarcacao, NovaMarcacao, StatusMarcacao, TipoMarcacao};
pub use registro::{
    aprovar_marcacao, marcacoes_do_dia, marcacoes_do_mes, marcacoes_pendentes,
    registrar_automatico, registrar_ponto, rejeitar_marcacao, resumo_dia, resumo_mensal,
};
pub use resumo::{formatar_duracao, formatar_saldo, Jornada};
