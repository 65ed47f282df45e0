use super::marcacao::{MarcacaoPonto, StatusMarcacao, TipoMarcacao};

/// Decides which punch comes next in a collaborator's day.
///
/// Each day flows through: ENTRADA → ENTRADA_ALMOCO → VOLTA_ALMOCO → SAIDA
pub struct MaquinaPonto;

impl MaquinaPonto {
    /// Compute the type of the next punch from the punches already recorded
    /// today (in any order).
    ///
    /// - No `Entrada` yet: `Entrada`.
    /// - `Entrada` but no lunch out: `EntradaAlmoco`.
    /// - Lunch out but no lunch return: `VoltaAlmoco`.
    /// - No `Saida` yet: `Saida`.
    /// - A full cycle already recorded: `Entrada` again, so a second shift on
    ///   the same day starts over.
    ///
    /// Rejected punches are ignored.
    pub fn proximo(marcacoes_hoje: &[MarcacaoPonto]) -> TipoMarcacao {
        let tem = |tipo: TipoMarcacao| {
            marcacoes_hoje
                .iter()
                .any(|m| m.tipo == tipo && m.status != StatusMarcacao::Rejeitado)
        };

        let tem_entrada = tem(TipoMarcacao::Entrada);
        let tem_entrada_almoco = tem(TipoMarcacao::EntradaAlmoco);
        let tem_volta_almoco = tem(TipoMarcacao::VoltaAlmoco);
        let tem_saida = tem(TipoMarcacao::Saida);

        if !tem_entrada {
            TipoMarcacao::Entrada
        } else if !tem_entrada_almoco {
            TipoMarcacao::EntradaAlmoco
        } else if !tem_volta_almoco {
            TipoMarcacao::VoltaAlmoco
        } else if !tem_saida {
            TipoMarcacao::Saida
        } else {
            TipoMarcacao::Entrada
        }
    }
}
