//! Apuração diária e mensal de frequência.
//!
//! A partir das marcações de um dia calcula horas trabalhadas, atrasos e o
//! saldo do banco de horas. Todos os horários são interpretados no fuso local
//! configurado (deslocamento fixo).

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;

use super::marcacao::{MarcacaoPonto, StatusMarcacao, TipoMarcacao};

/// Regras de jornada usadas na apuração.
#[derive(Debug, Clone, Copy)]
pub struct Jornada {
    pub offset: FixedOffset,
    /// Entradas depois deste horário (em minutos) contam como atraso.
    pub inicio_expediente: NaiveTime,
    pub minutos_esperados: i64,
}

impl Jornada {
    /// Data local de um instante.
    pub fn data_local(&self, instante: DateTime<Utc>) -> NaiveDate {
        instante.with_timezone(&self.offset).date_naive()
    }

    /// Janela semiaberta `[início, fim)` em UTC de um dia local.
    pub fn janela_dia(&self, dia: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let inicio = self.inicio_do_dia(dia);
        let fim = self.inicio_do_dia(dia.succ_opt().unwrap_or(dia));
        (inicio, fim)
    }

    /// Janela semiaberta `[início, fim)` em UTC do mês local que contém `referencia`.
    pub fn janela_mes(&self, referencia: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let primeiro = referencia.with_day(1).unwrap_or(referencia);
        let proximo = if primeiro.month() == 12 {
            NaiveDate::from_ymd_opt(primeiro.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(primeiro.year(), primeiro.month() + 1, 1)
        }
        .unwrap_or(primeiro);
        (self.inicio_do_dia(primeiro), self.inicio_do_dia(proximo))
    }

    fn inicio_do_dia(&self, dia: NaiveDate) -> DateTime<Utc> {
        let local = dia.and_time(NaiveTime::MIN);
        // Um deslocamento fixo nunca é ambíguo.
        (local - chrono::Duration::seconds(self.offset.local_minus_utc() as i64)).and_utc()
    }

    fn atrasada(&self, instante: DateTime<Utc>) -> bool {
        let local = instante.with_timezone(&self.offset).time();
        let ao_minuto = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(local);
        ao_minuto > self.inicio_expediente
    }
}

/// Resumo de um dia de trabalho de um colaborador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResumoDia {
    pub minutos_trabalhados: i64,
    pub atrasos: usize,
    /// Trabalhado menos esperado; zero em dias sem marcação.
    pub saldo_minutos: i64,
}

impl ResumoDia {
    pub fn calcular(marcacoes: &[MarcacaoPonto], jornada: &Jornada) -> Self {
        let mut ordenadas: Vec<&MarcacaoPonto> = marcacoes
            .iter()
            .filter(|m| m.status != StatusMarcacao::Rejeitado)
            .collect();
        if ordenadas.is_empty() {
            return Self {
                minutos_trabalhados: 0,
                atrasos: 0,
                saldo_minutos: 0,
            };
        }
        ordenadas.sort_by_key(|m| m.data_hora);

        let primeira = |tipo: TipoMarcacao| ordenadas.iter().find(|m| m.tipo == tipo);
        let entrada = primeira(TipoMarcacao::Entrada);
        let entrada_almoco = primeira(TipoMarcacao::EntradaAlmoco);
        let volta_almoco = primeira(TipoMarcacao::VoltaAlmoco);
        let saida = ordenadas.iter().rev().find(|m| m.tipo == TipoMarcacao::Saida);

        let mut total_ms: i64 = 0;
        if let (Some(e), Some(s)) = (entrada, saida) {
            let ms = (s.data_hora - e.data_hora).num_milliseconds();
            if ms > 0 {
                total_ms += ms;
            }
        }
        if let (Some(ida), Some(volta)) = (entrada_almoco, volta_almoco) {
            let ms = (volta.data_hora - ida.data_hora).num_milliseconds();
            if ms > 0 {
                total_ms -= ms;
            }
        }

        // Arredonda para o minuto mais próximo, meio minuto para cima.
        let minutos_trabalhados = if total_ms > 0 {
            (total_ms + 30_000) / 60_000
        } else {
            0
        };

        let atrasos = ordenadas
            .iter()
            .filter(|m| m.tipo == TipoMarcacao::Entrada && jornada.atrasada(m.data_hora))
            .count();

        Self {
            minutos_trabalhados,
            atrasos,
            saldo_minutos: minutos_trabalhados - jornada.minutos_esperados,
        }
    }

    pub fn horas_trabalhadas(&self) -> String {
        formatar_duracao(self.minutos_trabalhados)
    }

    pub fn banco_horas(&self) -> String {
        formatar_saldo(self.saldo_minutos)
    }
}

/// Consolidação mensal: um [`ResumoDia`] por dia com marcações.
#[derive(Debug, Clone, Serialize)]
pub struct ResumoMensal {
    pub dias: BTreeMap<NaiveDate, ResumoDia>,
    pub minutos_trabalhados: i64,
    pub atrasos: usize,
    pub saldo_minutos: i64,
}

impl ResumoMensal {
    pub fn calcular(marcacoes: &[MarcacaoPonto], jornada: &Jornada) -> Self {
        let mut por_dia: BTreeMap<NaiveDate, Vec<MarcacaoPonto>> = BTreeMap::new();
        for m in marcacoes {
            por_dia
                .entry(jornada.data_local(m.data_hora))
                .or_default()
                .push(m.clone());
        }

        let dias: BTreeMap<NaiveDate, ResumoDia> = por_dia
            .into_iter()
            .map(|(dia, ms)| (dia, ResumoDia::calcular(&ms, jornada)))
            .collect();

        Self {
            minutos_trabalhados: dias.values().map(|d| d.minutos_trabalhados).sum(),
            atrasos: dias.values().map(|d| d.atrasos).sum(),
            saldo_minutos: dias.values().map(|d| d.saldo_minutos).sum(),
            dias,
        }
    }
}

/// Formata minutos como `"{h}h {mm}min"`, ignorando o sinal.
pub fn formatar_duracao(minutos: i64) -> String {
    let abs = minutos.abs();
    format!("{}h {:02}min", abs / 60, abs % 60)
}

/// Formata um saldo com sinal: `"+1h 05min"`, `"-0h 30min"`, ou `"0h 00min"`.
pub fn formatar_saldo(minutos: i64) -> String {
    match minutos.signum() {
        0 => formatar_duracao(0),
        1 => format!("+{}", formatar_duracao(minutos)),
        _ => format!("-{}", formatar_duracao(minutos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ponto::marcacao::{MetodoMarcacao, NovaMarcacao};
    use chrono::TimeZone;

    fn jornada() -> Jornada {
        Jornada {
            offset: FixedOffset::west_opt(3 * 3600).unwrap(),
            inicio_expediente: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            minutos_esperados: 480,
        }
    }

    // Horário local de Brasília em 2025-03-10.
    fn punch(tipo: TipoMarcacao, h: u32, m: u32, s: u32) -> MarcacaoPonto {
        let local = jornada()
            .offset
            .with_ymd_and_hms(2025, 3, 10, h, m, s)
            .unwrap();
        MarcacaoPonto::new(
            NovaMarcacao {
                colaborador_id: "c1".into(),
                ..Default::default()
            },
            tipo,
            MetodoMarcacao::Facial,
            local.with_timezone(&Utc),
        )
        .unwrap()
    }

    #[test]
    fn empty_day_is_all_zero() {
        let r = ResumoDia::calcular(&[], &jornada());
        assert_eq!(r.minutos_trabalhados, 0);
        assert_eq!(r.atrasos, 0);
        assert_eq!(r.horas_trabalhadas(), "0h 00min");
        assert_eq!(r.banco_horas(), "0h 00min");
    }

    #[test]
    fn full_day_with_lunch() {
        let dia = vec![
            punch(TipoMarcacao::Saida, 17, 30, 0),
            punch(TipoMarcacao::Entrada, 8, 0, 0),
            punch(TipoMarcacao::EntradaAlmoco, 12, 0, 0),
            punch(TipoMarcacao::VoltaAlmoco, 13, 0, 0),
        ];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.minutos_trabalhados, 8 * 60 + 30);
        assert_eq!(r.atrasos, 0);
        assert_eq!(r.horas_trabalhadas(), "8h 30min");
        assert_eq!(r.banco_horas(), "+0h 30min");
    }

    #[test]
    fn lateness_counts_minutes_after_start() {
        let dia = vec![
            punch(TipoMarcacao::Entrada, 8, 0, 59),
            punch(TipoMarcacao::Entrada, 8, 1, 0),
            punch(TipoMarcacao::Entrada, 9, 15, 0),
            punch(TipoMarcacao::Saida, 18, 0, 0),
        ];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.atrasos, 2);
        // First ENTRADA to last SAIDA: 9h59m01s rounds to 599 minutes.
        assert_eq!(r.minutos_trabalhados, 10 * 60 - 1);
    }

    #[test]
    fn missing_saida_charges_full_day() {
        let dia = vec![punch(TipoMarcacao::Entrada, 7, 55, 0)];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.minutos_trabalhados, 0);
        assert_eq!(r.banco_horas(), "-8h 00min");
    }

    #[test]
    fn inverted_lunch_is_not_subtracted() {
        let dia = vec![
            punch(TipoMarcacao::Entrada, 8, 0, 0),
            punch(TipoMarcacao::VoltaAlmoco, 12, 0, 0),
            punch(TipoMarcacao::EntradaAlmoco, 13, 0, 0),
            punch(TipoMarcacao::Saida, 16, 0, 0),
        ];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.minutos_trabalhados, 8 * 60);
        assert_eq!(r.banco_horas(), "0h 00min");
    }

    #[test]
    fn lunch_longer_than_day_floors_at_zero() {
        let dia = vec![
            punch(TipoMarcacao::EntradaAlmoco, 7, 0, 0),
            punch(TipoMarcacao::Entrada, 8, 0, 0),
            punch(TipoMarcacao::Saida, 9, 0, 0),
            punch(TipoMarcacao::VoltaAlmoco, 11, 0, 0),
        ];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.minutos_trabalhados, 0);
    }

    #[test]
    fn rounds_to_nearest_minute() {
        let dia = vec![
            punch(TipoMarcacao::Entrada, 8, 0, 0),
            punch(TipoMarcacao::Saida, 16, 0, 30),
        ];
        let r = ResumoDia::calcular(&dia, &jornada());
        assert_eq!(r.minutos_trabalhados, 481);
    }

    #[test]
    fn saldo_formatting() {
        assert_eq!(formatar_saldo(0), "0h 00min");
        assert_eq!(formatar_saldo(65), "+1h 05min");
        assert_eq!(formatar_saldo(-125), "-2h 05min");
        assert_eq!(formatar_duracao(-30), "0h 30min");
    }

    #[test]
    fn day_window_uses_local_midnight() {
        let j = jornada();
        let (inicio, fim) = j.janela_dia(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(inicio, Utc.with_ymd_and_hms(2025, 3, 10, 3, 0, 0).unwrap());
        assert_eq!(fim, Utc.with_ymd_and_hms(2025, 3, 11, 3, 0, 0).unwrap());
    }

    #[test]
    fn month_window_wraps_year() {
        let j = jornada();
        let (inicio, fim) = j.janela_mes(NaiveDate::from_ymd_opt(2024, 12, 17).unwrap());
        assert_eq!(inicio, Utc.with_ymd_and_hms(2024, 12, 1, 3, 0, 0).unwrap());
        assert_eq!(fim, Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap());
    }

    #[test]
    fn monthly_summary_groups_by_local_day() {
        let mut ms = vec![
            punch(TipoMarcacao::Entrada, 8, 0, 0),
            punch(TipoMarcacao::Saida, 17, 0, 0),
        ];
        // 23:30 local on the 10th is already the 11th in UTC.
        ms.push(punch(TipoMarcacao::Entrada, 23, 30, 0));
        let r = ResumoMensal::calcular(&ms, &jornada());
        assert_eq!(r.dias.len(), 1);
        assert_eq!(r.minutos_trabalhados, 9 * 60);
        assert_eq!(r.atrasos, 1);
        assert_eq!(r.saldo_minutos, 60);
    }
}
