//! Dashboard indicators computed from the store.
//!
//! Every function takes the current instant explicitly; "today" and the day
//! windows are resolved in the local offset of the [`Jornada`].

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::cadastros::Colaborador;
use crate::error::{RhError, RhResult};
use crate::ferias::{StatusFerias, Urgencia};
use crate::ponto::{Jornada, MetodoMarcacao, StatusMarcacao, TipoMarcacao};
use crate::store::Dados;

/// A value with its change against the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicador<T> {
    pub valor: T,
    pub variacao: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metricas {
    pub colaboradores_ativos: usize,
    /// Pending requests created in the window; variation is current minus previous.
    pub solicitacoes_pendentes: Indicador<i64>,
    /// Approved vacations starting in the next `dias` days.
    pub ferias_proximas: Indicador<i64>,
    /// Percent of expected workdays without an entry. Variation is previous
    /// minus current, so a positive number is an improvement.
    pub absenteismo: Indicador<f64>,
}

/// Longest window accepted by the dashboard queries (about ten years).
const MAX_DIAS: i64 = 3660;

fn exigir_dias(dias: i64) -> RhResult<()> {
    if dias < 1 {
        return Err(RhError::validacao("O período deve ter pelo menos 1 dia"));
    }
    if dias > MAX_DIAS {
        return Err(RhError::validacao(format!(
            "O período deve ter no máximo {MAX_DIAS} dias"
        )));
    }
    Ok(())
}

fn ativos(dados: &Dados) -> Vec<&Colaborador> {
    dados.colaboradores.iter().filter(|c| c.ativo()).collect()
}

pub fn metricas(dados: &Dados, dias: i64, agora: DateTime<Utc>, jornada: &Jornada) -> RhResult<Metricas> {
    exigir_dias(dias)?;
    let hoje = jornada.data_local(agora);

    let (inicio, _) = jornada.janela_dia(hoje - Duration::days(dias));
    let (inicio_anterior, _) = jornada.janela_dia(hoje - Duration::days(2 * dias));
    let pendentes_em = |de: DateTime<Utc>, ate: DateTime<Utc>| {
        dados
            .solicitacoes_ferias
            .iter()
            .filter(|s| s.status == StatusFerias::Pendente && s.created_at >= de && s.created_at < ate)
            .count() as i64
    };
    let pendentes = pendentes_em(inicio, agora + Duration::seconds(1));
    let pendentes_antes = pendentes_em(inicio_anterior, inicio);

    let aprovadas_entre = |de: NaiveDate, ate: NaiveDate| {
        dados
            .solicitacoes_ferias
            .iter()
            .filter(|s| s.status == StatusFerias::Aprovado && s.data_inicio >= de && s.data_inicio < ate)
            .count() as i64
    };
    let proximas = aprovadas_entre(hoje, hoje + Duration::days(dias));
    let proximas_antes = aprovadas_entre(hoje - Duration::days(dias), hoje);

    let absenteismo = taxa_absenteismo(dados, hoje - Duration::days(dias - 1), hoje, jornada);
    let absenteismo_antes = taxa_absenteismo(
        dados,
        hoje - Duration::days(2 * dias - 1),
        hoje - Duration::days(dias),
        jornada,
    );

    Ok(Metricas {
        colaboradores_ativos: ativos(dados).len(),
        solicitacoes_pendentes: Indicador {
            valor: pendentes,
            variacao: pendentes - pendentes_antes,
        },
        ferias_proximas: Indicador {
            valor: proximas,
            variacao: proximas - proximas_antes,
        },
        absenteismo: Indicador {
            valor: absenteismo,
            variacao: uma_casa(absenteismo_antes - absenteismo),
        },
    })
}

fn uma_casa(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn dia_util(dia: NaiveDate) -> bool {
    !matches!(dia.weekday(), Weekday::Sat | Weekday::Sun)
}

// Collaborators with a non-rejected ENTRADA on the given local day.
fn presentes_no_dia<'a>(dados: &'a Dados, dia: NaiveDate, jornada: &Jornada) -> HashSet<&'a str> {
    let (de, ate) = jornada.janela_dia(dia);
    presentes_entre(dados, de, ate)
}

fn presentes_entre(dados: &Dados, de: DateTime<Utc>, ate: DateTime<Utc>) -> HashSet<&str> {
    dados
        .marcacoes
        .iter()
        .filter(|m| {
            m.tipo == TipoMarcacao::Entrada
                && m.status != StatusMarcacao::Rejeitado
                && m.data_hora >= de
                && m.data_hora < ate
        })
        .map(|m| m.colaborador_id.as_str())
        .collect()
}

/// Absence rate between two local dates (inclusive), over weekdays on which
/// each active collaborator was already admitted.
fn taxa_absenteismo(dados: &Dados, de: NaiveDate, ate: NaiveDate, jornada: &Jornada) -> f64 {
    let ativos = ativos(dados);
    let mut esperados = 0usize;
    let mut faltas = 0usize;

    for dia in de.iter_days().take_while(|d| *d <= ate).filter(|d| dia_util(*d)) {
        let presentes = presentes_no_dia(dados, dia, jornada);
        for c in ativos.iter().filter(|c| c.data_admissao <= dia) {
            esperados += 1;
            if !presentes.contains(c.id.as_str()) {
                faltas += 1;
            }
        }
    }

    if esperados == 0 {
        return 0.0;
    }
    uma_casa(faltas as f64 * 100.0 / esperados as f64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresencaDia {
    pub dia: String,
    pub presente: u32,
    pub parcial: u32,
    pub ausente: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresencaSemanal {
    pub total_colaboradores: usize,
    pub dias: Vec<PresencaDia>,
}

fn abreviacao(dia: Weekday) -> &'static str {
    match dia {
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
        Weekday::Sun => "Dom",
    }
}

fn percentual(parte: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (parte as f64 * 100.0 / total as f64).round() as u32
}

fn balde(rotulo: String, presentes: &HashSet<&str>, ativos: &[&Colaborador]) -> PresencaDia {
    let total = ativos.len();
    let presentes = ativos.iter().filter(|c| presentes.contains(c.id.as_str())).count();
    PresencaDia {
        dia: rotulo,
        presente: percentual(presentes, total),
        parcial: 0,
        ausente: percentual(total - presentes, total),
    }
}

/// Attendance buckets for the last `dias` days.
///
/// Up to a week, one bucket per weekday ending today; longer windows are
/// grouped into at most five `Sem N` buckets starting `dias` days ago.
pub fn presenca_semanal(
    dados: &Dados,
    dias: i64,
    agora: DateTime<Utc>,
    jornada: &Jornada,
) -> RhResult<PresencaSemanal> {
    exigir_dias(dias)?;
    let hoje = jornada.data_local(agora);
    let ativos = ativos(dados);

    let mut buckets = Vec::new();
    if dias <= 7 {
        let inicio = hoje - Duration::days(dias - 1);
        for dia in inicio.iter_days().take_while(|d| *d <= hoje).filter(|d| dia_util(*d)) {
            let presentes = presentes_no_dia(dados, dia, jornada);
            buckets.push(balde(abreviacao(dia.weekday()).to_string(), &presentes, &ativos));
        }
    } else {
        let inicio = hoje - Duration::days(dias);
        let semanas = (dias as u64).div_ceil(7).min(5);
        for semana in 0..semanas as i64 {
            let primeiro = inicio + Duration::days(semana * 7);
            if primeiro > hoje {
                break;
            }
            let (de, _) = jornada.janela_dia(primeiro);
            let (_, ate) = jornada.janela_dia((primeiro + Duration::days(6)).min(hoje));
            let presentes = presentes_entre(dados, de, ate);
            buckets.push(balde(format!("Sem {}", semana + 1), &presentes, &ativos));
        }
    }

    Ok(PresencaSemanal {
        total_colaboradores: ativos.len(),
        dias: buckets,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headcount {
    pub departamento_id: String,
    pub departamento: String,
    pub atual: usize,
    pub planejado: usize,
}

/// Active collaborators per active department, with a plan of +10%.
pub fn headcount(dados: &Dados) -> Vec<Headcount> {
    dados
        .departamentos
        .iter()
        .filter(|d| d.ativo)
        .map(|d| {
            let atual = dados
                .colaboradores
                .iter()
                .filter(|c| c.ativo() && c.departamento_id == d.id)
                .count();
            Headcount {
                departamento_id: d.id.clone(),
                departamento: d.nome.clone(),
                atual,
                planejado: (atual as f64 * 1.1).round() as usize,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoAcao {
    Ferias,
    AjustePonto,
}

/// An item waiting for someone's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcaoImediata {
    pub id: String,
    pub tipo: TipoAcao,
    pub colaborador_id: String,
    pub colaborador_nome: Option<String>,
    pub descricao: String,
    pub urgencia: Option<Urgencia>,
    pub created_at: DateTime<Utc>,
}

/// Pending vacation requests and manual punches, newest first.
pub fn acoes_imediatas(dados: &Dados, limite: usize, jornada: &Jornada) -> Vec<AcaoImediata> {
    let nome = |id: &str| dados.colaborador(id).ok().map(|c| c.nome_completo.clone());

    let ferias = dados
        .solicitacoes_ferias
        .iter()
        .filter(|s| s.status == StatusFerias::Pendente)
        .map(|s| AcaoImediata {
            id: s.id.clone(),
            tipo: TipoAcao::Ferias,
            colaborador_id: s.colaborador_id.clone(),
            colaborador_nome: nome(&s.colaborador_id),
            descricao: format!(
                "Férias de {} a {} ({} dias)",
                s.data_inicio.format("%d/%m/%Y"),
                s.data_fim.format("%d/%m/%Y"),
                s.total_dias
            ),
            urgencia: Some(s.urgencia),
            created_at: s.created_at,
        });

    let ajustes = dados
        .marcacoes
        .iter()
        .filter(|m| m.status == StatusMarcacao::Pendente && m.metodo == MetodoMarcacao::Manual)
        .map(|m| {
            let local = m.data_hora.with_timezone(&jornada.offset);
            AcaoImediata {
                id: m.id.clone(),
                tipo: TipoAcao::AjustePonto,
                colaborador_id: m.colaborador_id.clone(),
                colaborador_nome: nome(&m.colaborador_id),
                descricao: format!("{} manual em {}", m.tipo.rotulo(), local.format("%d/%m/%Y %H:%M")),
                urgencia: None,
                created_at: m.created_at,
            }
        });

    let mut acoes: Vec<AcaoImediata> = ferias.chain(ajustes).collect();
    acoes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    acoes.truncate(limite);
    acoes
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveTime, TimeZone};

    use super::*;
    use crate::cadastros::colaborador::{self, tests::base};
    use crate::ferias::{self, FormFerias};
    use crate::ponto::{MarcacaoPonto, NovaMarcacao};

    fn jornada() -> Jornada {
        Jornada {
            offset: FixedOffset::west_opt(3 * 3600).unwrap(),
            inicio_expediente: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            minutos_esperados: 480,
        }
    }

    // Friday 2025-03-14, 15:00 local.
    fn agora() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        jornada()
            .offset
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn setup(n: u32) -> (Dados, Vec<String>) {
        let (mut dados, dep, cargo, unidade) = base();
        let ids = (1..=n)
            .map(|i| {
                colaborador::criar(&mut dados, colaborador::tests::form(i, &dep, &cargo, &unidade))
                    .unwrap()
                    .id
            })
            .collect();
        (dados, ids)
    }

    fn entrada(dados: &mut Dados, colaborador: &str, quando: DateTime<Utc>) {
        let m = MarcacaoPonto::new(
            NovaMarcacao {
                colaborador_id: colaborador.into(),
                ..Default::default()
            },
            TipoMarcacao::Entrada,
            MetodoMarcacao::Facial,
            quando,
        )
        .unwrap();
        dados.marcacoes.push(m);
    }

    fn solicitar(dados: &mut Dados, colaborador: &str, inicio: NaiveDate, criada: DateTime<Utc>) -> String {
        ferias::criar(
            dados,
            FormFerias {
                colaborador_id: colaborador.into(),
                data_inicio: Some(inicio),
                data_fim: Some(inicio + Duration::days(9)),
                ..Default::default()
            },
            criada,
        )
        .unwrap()
        .id
    }

    #[test]
    fn pending_requests_compare_windows() {
        let (mut dados, ids) = setup(1);
        let inicio = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        solicitar(&mut dados, &ids[0], inicio, agora() - Duration::days(2));
        solicitar(&mut dados, &ids[0], inicio, agora() - Duration::days(3));
        solicitar(&mut dados, &ids[0], inicio, agora() - Duration::days(40));

        let m = metricas(&dados, 30, agora(), &jornada()).unwrap();
        assert_eq!(m.solicitacoes_pendentes, Indicador { valor: 2, variacao: 1 });
    }

    #[test]
    fn upcoming_approved_vacations() {
        let (mut dados, ids) = setup(1);
        let hoje = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        for inicio in [hoje + Duration::days(5), hoje + Duration::days(40), hoje - Duration::days(3)] {
            let id = solicitar(&mut dados, &ids[0], inicio, agora());
            ferias::atualizar_status(&mut dados, &id, StatusFerias::Aprovado, None, None, agora()).unwrap();
        }
        // Pending ones are not counted.
        solicitar(&mut dados, &ids[0], hoje + Duration::days(1), agora());

        let m = metricas(&dados, 30, agora(), &jornada()).unwrap();
        assert_eq!(m.ferias_proximas, Indicador { valor: 1, variacao: 0 });
    }

    #[test]
    fn absenteeism_counts_weekdays_without_entry() {
        let (mut dados, ids) = setup(2);
        // Mon 10 .. Fri 14 March: first collaborator present every day,
        // second only on Monday.
        for d in 10..=14 {
            entrada(&mut dados, &ids[0], local(2025, 3, d, 8));
        }
        entrada(&mut dados, &ids[1], local(2025, 3, 10, 8));

        let m = metricas(&dados, 7, agora(), &jornada()).unwrap();
        // 10 expected collaborator-days, 4 absences.
        assert_eq!(m.absenteismo.valor, 40.0);
        // Previous week: nobody punched at all.
        assert_eq!(m.absenteismo.variacao, 60.0);
    }

    #[test]
    fn weekly_presence_short_window_uses_weekday_labels() {
        let (mut dados, ids) = setup(4);
        entrada(&mut dados, &ids[0], local(2025, 3, 13, 8));
        entrada(&mut dados, &ids[1], local(2025, 3, 13, 9));
        // Two entries by the same person count once.
        entrada(&mut dados, &ids[1], local(2025, 3, 13, 13));
        entrada(&mut dados, &ids[2], local(2025, 3, 14, 8));

        let p = presenca_semanal(&dados, 7, agora(), &jornada()).unwrap();
        assert_eq!(p.total_colaboradores, 4);
        let rotulos: Vec<_> = p.dias.iter().map(|d| d.dia.as_str()).collect();
        assert_eq!(rotulos, vec!["Seg", "Ter", "Qua", "Qui", "Sex"]);
        assert_eq!(
            p.dias[3],
            PresencaDia {
                dia: "Qui".into(),
                presente: 50,
                parcial: 0,
                ausente: 50
            }
        );
        assert_eq!(p.dias[4].presente, 25);
        assert_eq!(p.dias[0].ausente, 100);
    }

    #[test]
    fn window_length_is_bounded() {
        let (dados, _) = setup(1);
        for dias in [0, MAX_DIAS + 1, 200_000_000, i64::MAX] {
            assert!(matches!(
                metricas(&dados, dias, agora(), &jornada()),
                Err(RhError::Validacao(_))
            ));
            assert!(matches!(
                presenca_semanal(&dados, dias, agora(), &jornada()),
                Err(RhError::Validacao(_))
            ));
        }
        assert!(metricas(&dados, MAX_DIAS, agora(), &jornada()).is_ok());
        assert!(presenca_semanal(&dados, MAX_DIAS, agora(), &jornada()).is_ok());
    }

    #[test]
    fn weekly_presence_long_window_groups_by_week() {
        let (mut dados, ids) = setup(1);
        entrada(&mut dados, &ids[0], local(2025, 3, 12, 8));
        let p = presenca_semanal(&dados, 30, agora(), &jornada()).unwrap();
        assert_eq!(p.dias.len(), 5);
        assert_eq!(p.dias[0].dia, "Sem 1");
        assert_eq!(p.dias.last().unwrap().presente, 100);
    }

    #[test]
    fn weekly_presence_without_collaborators_is_zero() {
        let dados = Dados::default();
        let p = presenca_semanal(&dados, 7, agora(), &jornada()).unwrap();
        assert!(p.dias.iter().all(|d| d.presente == 0 && d.ausente == 0));
    }

    #[test]
    fn headcount_plans_ten_percent_more() {
        let (mut dados, ids) = setup(5);
        colaborador::desativar(&mut dados, &ids[4]).unwrap();
        let h = headcount(&dados);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].atual, 4);
        assert_eq!(h[0].planejado, 4);

        let (dados, _) = setup(10);
        assert_eq!(headcount(&dados)[0].planejado, 11);
    }

    #[test]
    fn immediate_actions_merge_and_truncate() {
        let (mut dados, ids) = setup(1);
        let inicio = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        solicitar(&mut dados, &ids[0], inicio, agora() - Duration::hours(3));
        solicitar(&mut dados, &ids[0], inicio, agora() - Duration::hours(1));

        let mut manual = MarcacaoPonto::new(
            NovaMarcacao {
                colaborador_id: ids[0].clone(),
                justificativa: Some("Esqueci de marcar".into()),
                ..Default::default()
            },
            TipoMarcacao::Saida,
            MetodoMarcacao::Manual,
            local(2025, 3, 13, 18),
        )
        .unwrap();
        manual.created_at = agora() - Duration::hours(2);
        dados.marcacoes.push(manual);

        let acoes = acoes_imediatas(&dados, 5, &jornada());
        let tipos: Vec<_> = acoes.iter().map(|a| a.tipo).collect();
        assert_eq!(tipos, vec![TipoAcao::Ferias, TipoAcao::AjustePonto, TipoAcao::Ferias]);
        assert_eq!(acoes[1].descricao, "Saída manual em 13/03/2025 18:00");

        assert_eq!(acoes_imediatas(&dados, 2, &jornada()).len(), 2);
    }

    #[test]
    fn zero_day_window_is_rejected() {
        let dados = Dados::default();
        assert!(metricas(&dados, 0, agora(), &jornada()).is_err());
    }
}
