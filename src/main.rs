mod cadastros;
mod cli;
mod config;
mod dashboard;
mod error;
mod facial;
mod ferias;
mod nextcloud;
mod ponto;
mod relogio;
mod store;
mod ui;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use console::Style;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cadastros::colaborador::{self, FiltroColaboradores};
use cadastros::{cargo, departamento, unidade, Consulta};
use cli::{
    AcaoCadastro, AcaoColaborador, AcaoDashboard, AcaoDepartamento, AcaoFerias, AcaoPonto, Cli,
    Command, ConsultaArgs,
};
use config::RhConfig;
use facial::FaceRecognitionClient;
use ferias::{FormFerias, StatusFerias};
use nextcloud::{paths, NextcloudClient};
use ponto::{formatar_duracao, formatar_saldo, Jornada, MarcacaoPonto, NovaMarcacao};
use relogio::{Captura, Imagem, Relogio};
use store::Store;
use ui::{Progresso, Saida};

fn init_tracing(verbose: bool) {
    let padrao = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(padrao));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::new().red().bold().apply_to("erro:"));
            ExitCode::FAILURE
        }
    }
}

/// Everything a command needs: configuration, the data file and the output.
struct Contexto {
    config: RhConfig,
    jornada: Jornada,
    store: Store,
    saida: Saida,
}

impl Contexto {
    fn salvar(&self) -> Result<()> {
        self.store
            .salvar()
            .with_context(|| format!("Falha ao gravar {}", self.store.path().display()))
    }

    fn relogio(&self) -> Result<Relogio<FaceRecognitionClient, NextcloudClient>> {
        let timeout = Duration::from_secs(self.config.http_timeout_secs);
        let reconhecedor = FaceRecognitionClient::new(&self.config.face_recognition_url, timeout)?;
        let armazenamento = NextcloudClient::new(
            &self.config.nextcloud_webdav_url,
            &self.config.nextcloud_user,
            &self.config.nextcloud_password,
            timeout,
        )?;
        Ok(Relogio {
            reconhecedor,
            armazenamento,
            jornada: self.jornada,
            app_url: self.config.app_url.clone(),
            max_upload_bytes: self.config.max_upload_bytes,
        })
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RhConfig::load_from(path)?,
        None => RhConfig::load()?,
    };
    let jornada = config.jornada()?;
    let store = Store::abrir(&config.data_file)
        .with_context(|| format!("Falha ao abrir {}", config.data_file.display()))?;
    debug!(data_file = %store.path().display(), "data file loaded");

    let mut ctx = Contexto {
        config,
        jornada,
        store,
        saida: Saida::new(cli.json),
    };

    match cli.command {
        Command::Colaborador { acao } => cmd_colaborador(&mut ctx, acao).await,
        Command::Departamento { acao } => cmd_departamento(&mut ctx, acao),
        Command::Cargo { acao } => cmd_cargo(&mut ctx, acao),
        Command::Unidade { acao } => cmd_unidade(&mut ctx, acao),
        Command::Ferias { acao } => cmd_ferias(&mut ctx, acao),
        Command::Ponto { acao } => cmd_ponto(&mut ctx, acao).await,
        Command::Dashboard { acao } => cmd_dashboard(&ctx, acao),
        Command::Imagem { path, saida } => cmd_imagem(&ctx, &path, &saida).await,
    }
}

/// Reads a form from a JSON or TOML file, chosen by extension.
fn ler_formulario<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let conteudo = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let form = if toml {
        toml::from_str(&conteudo).with_context(|| format!("TOML inválido em {}", path.display()))?
    } else {
        serde_json::from_str(&conteudo)
            .with_context(|| format!("JSON inválido em {}", path.display()))?
    };
    Ok(form)
}

fn ler_imagem(path: &Path) -> Result<Imagem> {
    let bytes = std::fs::read(path).with_context(|| format!("Falha ao ler {}", path.display()))?;
    let nome = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = paths::mime_imagem(&nome)
        .unwrap_or("application/octet-stream")
        .to_string();
    Ok(Imagem { nome, mime, bytes })
}

fn consulta(args: ConsultaArgs) -> Consulta {
    Consulta {
        busca: args.busca,
        ativo: args.ativo,
        ordem: args.ordem,
        pagina: args.pagina,
        limite: args.limite,
        direcao: args.direcao,
    }
}

fn texto(valor: Option<&str>) -> String {
    valor.unwrap_or("-").to_string()
}

fn sim_nao(valor: bool) -> String {
    let s = if valor { "sim" } else { "não" };
    s.to_string()
}

fn rodape<T>(saida: &Saida, pagina: &cadastros::Pagina<T>) {
    if !saida.json() && pagina.total > 0 {
        println!(
            "Página {} de {} ({} registros)",
            pagina.pagina, pagina.total_paginas, pagina.total
        );
    }
}

fn hora_local(jornada: &Jornada, instante: DateTime<Utc>) -> String {
    instante
        .with_timezone(&jornada.offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

fn linhas_marcacoes(jornada: &Jornada, marcacoes: &[MarcacaoPonto]) -> Vec<Vec<String>> {
    marcacoes
        .iter()
        .map(|m| {
            vec![
                hora_local(jornada, m.data_hora),
                m.tipo.rotulo().to_string(),
                m.metodo.to_string(),
                m.status.to_string(),
                m.id.clone(),
            ]
        })
        .collect()
}

const CABECALHO_MARCACOES: [&str; 5] = ["Horário", "Tipo", "Método", "Status", "Id"];

async fn cmd_colaborador(ctx: &mut Contexto, acao: AcaoColaborador) -> Result<()> {
    match acao {
        AcaoColaborador::Criar { arquivo } => {
            let c = colaborador::criar(&mut ctx.store.dados, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Colaborador {} cadastrado ({})", c.nome_completo, c.id), &c);
        }
        AcaoColaborador::Atualizar { id, arquivo } => {
            let c = colaborador::atualizar(&mut ctx.store.dados, &id, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Colaborador {} atualizado", c.nome_completo), &c);
        }
        AcaoColaborador::Desativar { id } => {
            let c = colaborador::desativar(&mut ctx.store.dados, &id)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Colaborador {} desativado", c.nome_completo), &c);
        }
        AcaoColaborador::Obter { id } => {
            let detalhe = colaborador::obter(&ctx.store.dados, &id)?
                .com_urls_acessiveis(&ctx.config.app_url);
            ctx.saida.registro(&detalhe.colaborador.nome_completo, &detalhe);
        }
        AcaoColaborador::Listar {
            busca,
            status,
            departamento,
            cargo,
            ordem,
            direcao,
            pagina,
            limite,
        } => {
            let filtro = FiltroColaboradores {
                busca,
                status: status.status(),
                departamento_id: departamento,
                cargo_id: cargo,
                ordem,
                direcao,
                pagina,
                limite,
            };
            let mut resultado = colaborador::listar(&ctx.store.dados, &filtro)?;
            resultado.itens = resultado
                .itens
                .into_iter()
                .map(|d| d.com_urls_acessiveis(&ctx.config.app_url))
                .collect();
            let linhas: Vec<Vec<String>> = resultado
                .itens
                .iter()
                .map(|d| {
                    vec![
                        d.colaborador.matricula.clone(),
                        d.colaborador.nome_completo.clone(),
                        texto(d.cargo.as_ref().map(|r| r.nome.as_str())),
                        texto(d.departamento.as_ref().map(|r| r.nome.as_str())),
                        d.colaborador.status.to_string(),
                        d.colaborador.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Matrícula", "Nome", "Cargo", "Departamento", "Status", "Id"],
                &linhas,
                &resultado,
            );
            rodape(&ctx.saida, &resultado);
        }
        AcaoColaborador::Facial { id, imagem } => {
            let imagem = ler_imagem(&imagem)?;
            let relogio = ctx.relogio()?;
            let progresso = Progresso::iniciar("Enviando foto de referência...", ctx.saida.json());
            match relogio.cadastrar_facial(&mut ctx.store.dados, &id, &imagem).await {
                Ok(url) => {
                    progresso.concluir("Facial cadastrada");
                    ctx.salvar()?;
                    ctx.saida.sucesso(&format!("Foto de referência: {url}"), &serde_json::json!({ "url": url }));
                }
                Err(e) => {
                    progresso.falhar("Falha no cadastro da facial");
                    return Err(e);
                }
            }
        }
        AcaoColaborador::Avatar { id, imagem } => {
            let imagem = ler_imagem(&imagem)?;
            let relogio = ctx.relogio()?;
            let progresso = Progresso::iniciar("Enviando avatar...", ctx.saida.json());
            match relogio
                .enviar_avatar(&mut ctx.store.dados, &id, imagem, Utc::now())
                .await
            {
                Ok(url) => {
                    progresso.concluir("Avatar enviado");
                    ctx.salvar()?;
                    ctx.saida.sucesso(&format!("Avatar: {url}"), &serde_json::json!({ "url": url }));
                }
                Err(e) => {
                    progresso.falhar("Falha no envio do avatar");
                    return Err(e);
                }
            }
        }
    }
    Ok(())
}

fn cmd_departamento(ctx: &mut Contexto, acao: AcaoDepartamento) -> Result<()> {
    match acao {
        AcaoDepartamento::Criar { arquivo } => {
            let d = departamento::criar(&mut ctx.store.dados, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Departamento {} criado ({})", d.nome, d.id), &d);
        }
        AcaoDepartamento::Atualizar { id, arquivo } => {
            let d = departamento::atualizar(&mut ctx.store.dados, &id, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Departamento {} atualizado", d.nome), &d);
        }
        AcaoDepartamento::Desativar { id } => {
            let d = departamento::desativar(&mut ctx.store.dados, &id)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Departamento {} desativado", d.nome), &d);
        }
        AcaoDepartamento::Obter { id } => {
            let d = ctx.store.dados.departamento(&id)?;
            ctx.saida.registro(&d.nome, d);
        }
        AcaoDepartamento::Listar { consulta: args, pai } => {
            let dados = &ctx.store.dados;
            let resultado = departamento::listar(dados, &consulta(args), pai.as_deref())?;
            let linhas: Vec<Vec<String>> = resultado
                .itens
                .iter()
                .map(|d| {
                    let pai = d
                        .departamento_pai_id
                        .as_deref()
                        .and_then(|p| dados.departamento(p).ok())
                        .map(|p| p.nome.as_str());
                    vec![
                        d.codigo.clone(),
                        d.nome.clone(),
                        texto(pai),
                        texto(d.centro_custo.as_deref()),
                        sim_nao(d.ativo),
                        d.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Código", "Nome", "Pai", "Centro de custo", "Ativo", "Id"],
                &linhas,
                &resultado,
            );
            rodape(&ctx.saida, &resultado);
        }
    }
    Ok(())
}

fn cmd_cargo(ctx: &mut Contexto, acao: AcaoCadastro) -> Result<()> {
    match acao {
        AcaoCadastro::Criar { arquivo } => {
            let c = cargo::criar(&mut ctx.store.dados, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Cargo {} criado ({})", c.titulo, c.id), &c);
        }
        AcaoCadastro::Atualizar { id, arquivo } => {
            let c = cargo::atualizar(&mut ctx.store.dados, &id, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Cargo {} atualizado", c.titulo), &c);
        }
        AcaoCadastro::Desativar { id } => {
            let c = cargo::desativar(&mut ctx.store.dados, &id)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Cargo {} desativado", c.titulo), &c);
        }
        AcaoCadastro::Obter { id } => {
            let c = ctx.store.dados.cargo(&id)?;
            ctx.saida.registro(&c.titulo, c);
        }
        AcaoCadastro::Listar(args) => {
            let resultado = cargo::listar(&ctx.store.dados, &consulta(args))?;
            let linhas: Vec<Vec<String>> = resultado
                .itens
                .iter()
                .map(|c| {
                    vec![
                        c.codigo.clone(),
                        c.titulo.clone(),
                        texto(c.nivel.as_deref()),
                        texto(c.faixa_salarial().as_deref()),
                        sim_nao(c.ativo),
                        c.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Código", "Título", "Nível", "Faixa salarial", "Ativo", "Id"],
                &linhas,
                &resultado,
            );
            rodape(&ctx.saida, &resultado);
        }
    }
    Ok(())
}

fn cmd_unidade(ctx: &mut Contexto, acao: AcaoCadastro) -> Result<()> {
    match acao {
        AcaoCadastro::Criar { arquivo } => {
            let u = unidade::criar(&mut ctx.store.dados, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Unidade {} criada ({})", u.nome, u.id), &u);
        }
        AcaoCadastro::Atualizar { id, arquivo } => {
            let u = unidade::atualizar(&mut ctx.store.dados, &id, ler_formulario(&arquivo)?)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Unidade {} atualizada", u.nome), &u);
        }
        AcaoCadastro::Desativar { id } => {
            let u = unidade::desativar(&mut ctx.store.dados, &id)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Unidade {} desativada", u.nome), &u);
        }
        AcaoCadastro::Obter { id } => {
            let u = ctx.store.dados.unidade(&id)?;
            ctx.saida.registro(&u.nome, u);
        }
        AcaoCadastro::Listar(args) => {
            let resultado = unidade::listar(&ctx.store.dados, &consulta(args))?;
            let linhas: Vec<Vec<String>> = resultado
                .itens
                .iter()
                .map(|u| {
                    vec![
                        u.codigo.clone(),
                        u.nome.clone(),
                        texto(u.tipo.as_deref()),
                        u.endereco(),
                        sim_nao(u.ativo),
                        u.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Código", "Nome", "Tipo", "Endereço", "Ativo", "Id"],
                &linhas,
                &resultado,
            );
            rodape(&ctx.saida, &resultado);
        }
    }
    Ok(())
}

fn cmd_ferias(ctx: &mut Contexto, acao: AcaoFerias) -> Result<()> {
    let agora = Utc::now();
    match acao {
        AcaoFerias::Solicitar {
            colaborador,
            inicio,
            fim,
            dias,
            urgencia,
            observacoes,
        } => {
            let form = FormFerias {
                colaborador_id: colaborador,
                data_inicio: Some(inicio),
                data_fim: Some(fim),
                total_dias: dias,
                observacoes,
                urgencia: Some(urgencia),
            };
            let s = ferias::criar(&mut ctx.store.dados, form, agora)?;
            ctx.salvar()?;
            ctx.saida.sucesso(
                &format!("Solicitação {} aberta: {} dias a partir de {}", s.id, s.total_dias, s.data_inicio),
                &s,
            );
        }
        AcaoFerias::Aprovar { id, aprovador } => {
            let s = ferias::atualizar_status(&mut ctx.store.dados, &id, StatusFerias::Aprovado, None, aprovador, agora)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Solicitação {} aprovada", s.id), &s);
        }
        AcaoFerias::Rejeitar { id, motivo, aprovador } => {
            let s = ferias::atualizar_status(
                &mut ctx.store.dados,
                &id,
                StatusFerias::Rejeitado,
                motivo,
                aprovador,
                agora,
            )?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Solicitação {} rejeitada", s.id), &s);
        }
        AcaoFerias::Obter { id } => {
            let s = ctx.store.dados.solicitacao_ferias(&id)?;
            ctx.saida.registro("Solicitação de férias", s);
        }
        AcaoFerias::Listar { status } => {
            let solicitacoes = ferias::listar(&ctx.store.dados, status);
            let linhas: Vec<Vec<String>> = solicitacoes
                .iter()
                .map(|d| {
                    let s = &d.solicitacao;
                    vec![
                        texto(d.colaborador_nome.as_deref()),
                        texto(d.departamento_nome.as_deref()),
                        format!("{} a {}", s.data_inicio.format("%d/%m/%Y"), s.data_fim.format("%d/%m/%Y")),
                        s.total_dias.to_string(),
                        s.urgencia.to_string(),
                        s.status.to_string(),
                        s.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Colaborador", "Departamento", "Período", "Dias", "Urgência", "Status", "Id"],
                &linhas,
                &solicitacoes,
            );
        }
    }
    Ok(())
}

async fn cmd_ponto(ctx: &mut Contexto, acao: AcaoPonto) -> Result<()> {
    let agora = Utc::now();
    let jornada = ctx.jornada;
    match acao {
        AcaoPonto::Registrar {
            colaborador,
            tipo,
            metodo,
            justificativa,
            quando,
            dispositivo,
        } => {
            let quando = quando.unwrap_or(agora);
            let input = NovaMarcacao {
                colaborador_id: colaborador,
                tipo,
                metodo: Some(metodo),
                dispositivo_info: dispositivo,
                justificativa,
                ..Default::default()
            };
            let m = if tipo.is_some() {
                ponto::registrar_ponto(&mut ctx.store.dados, input, quando)?
            } else {
                ponto::registrar_automatico(&mut ctx.store.dados, &jornada, input, metodo, quando)?
            };
            ctx.salvar()?;
            ctx.saida.sucesso(
                &format!("{} registrada às {} ({})", m.tipo.rotulo(), hora_local(&jornada, m.data_hora), m.status),
                &m,
            );
        }
        AcaoPonto::Reconhecer {
            imagem,
            latitude,
            longitude,
            dispositivo,
        } => {
            let imagem = ler_imagem(&imagem)?;
            let relogio = ctx.relogio()?;
            let captura = Captura {
                latitude,
                longitude,
                dispositivo_info: dispositivo,
            };
            let progresso = Progresso::iniciar("Reconhecendo colaborador...", ctx.saida.json());
            match relogio
                .reconhecer(&mut ctx.store.dados, imagem.data_url(), captura, agora)
                .await
            {
                Ok(ponto) => {
                    progresso.concluir(&format!("Olá, {}", ponto.colaborador_nome));
                    ctx.salvar()?;
                    ctx.saida.sucesso(
                        &format!(
                            "{} registrada às {}",
                            ponto.tipo.rotulo(),
                            hora_local(&jornada, ponto.marcacao.data_hora)
                        ),
                        &ponto,
                    );
                }
                Err(e) => {
                    progresso.falhar("Colaborador não reconhecido");
                    return Err(e);
                }
            }
        }
        AcaoPonto::Hoje { colaborador } => {
            let dia = jornada.data_local(agora);
            mostrar_dia(ctx, &colaborador, dia)?;
        }
        AcaoPonto::Dia { colaborador, data } => mostrar_dia(ctx, &colaborador, data)?,
        AcaoPonto::Mes { colaborador, referencia } => {
            let referencia = referencia.unwrap_or_else(|| jornada.data_local(agora));
            let resumo = ponto::resumo_mensal(&ctx.store.dados, &jornada, &colaborador, referencia)?;
            let marcacoes = ponto::marcacoes_do_mes(&ctx.store.dados, &jornada, &colaborador, referencia);

            if ctx.saida.json() {
                ctx.saida.registro(
                    "Espelho de ponto",
                    &serde_json::json!({ "marcacoes": marcacoes, "resumo": resumo }),
                );
                return Ok(());
            }
            let linhas: Vec<Vec<String>> = resumo
                .dias
                .iter()
                .map(|(dia, r)| {
                    vec![
                        dia.format("%d/%m/%Y").to_string(),
                        r.horas_trabalhadas(),
                        r.atrasos.to_string(),
                        r.banco_horas(),
                    ]
                })
                .collect();
            ctx.saida.tabela(&["Dia", "Trabalhado", "Atrasos", "Saldo"], &linhas, &resumo);
            println!(
                "Total: {} trabalhadas, {} atraso(s), saldo {}",
                formatar_duracao(resumo.minutos_trabalhados),
                resumo.atrasos,
                formatar_saldo(resumo.saldo_minutos)
            );
        }
        AcaoPonto::Obter { id } => {
            let m = ctx.store.dados.marcacao(&id)?;
            ctx.saida.registro(m.tipo.rotulo(), m);
        }
        AcaoPonto::Pendentes => {
            let dados = &ctx.store.dados;
            let pendentes = ponto::marcacoes_pendentes(dados);
            let linhas: Vec<Vec<String>> = pendentes
                .iter()
                .map(|m| {
                    let nome = dados.colaborador(&m.colaborador_id).ok().map(|c| c.nome_completo.as_str());
                    vec![
                        texto(nome),
                        hora_local(&jornada, m.data_hora),
                        m.tipo.rotulo().to_string(),
                        texto(m.justificativa.as_deref()),
                        m.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(
                &["Colaborador", "Horário", "Tipo", "Justificativa", "Id"],
                &linhas,
                &pendentes,
            );
        }
        AcaoPonto::Aprovar { id, aprovador } => {
            let m = ponto::aprovar_marcacao(&mut ctx.store.dados, &id, aprovador, agora)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Marcação {} aprovada", m.id), &m);
        }
        AcaoPonto::Rejeitar { id, motivo, aprovador } => {
            let m = ponto::rejeitar_marcacao(&mut ctx.store.dados, &id, aprovador, motivo, agora)?;
            ctx.salvar()?;
            ctx.saida.sucesso(&format!("Marcação {} rejeitada", m.id), &m);
        }
    }
    Ok(())
}

fn mostrar_dia(ctx: &Contexto, colaborador_id: &str, dia: chrono::NaiveDate) -> Result<()> {
    let jornada = &ctx.jornada;
    let resumo = ponto::resumo_dia(&ctx.store.dados, jornada, colaborador_id, dia)?;
    let marcacoes = ponto::marcacoes_do_dia(&ctx.store.dados, jornada, colaborador_id, dia);

    if ctx.saida.json() {
        ctx.saida.registro(
            "Marcações",
            &serde_json::json!({ "dia": dia, "marcacoes": marcacoes, "resumo": resumo }),
        );
        return Ok(());
    }
    ctx.saida.tabela(&CABECALHO_MARCACOES, &linhas_marcacoes(jornada, &marcacoes), &marcacoes);
    println!(
        "Trabalhado: {}  Atrasos: {}  Banco de horas: {}",
        resumo.horas_trabalhadas(),
        resumo.atrasos,
        resumo.banco_horas()
    );
    Ok(())
}

fn cmd_dashboard(ctx: &Contexto, acao: AcaoDashboard) -> Result<()> {
    let agora = Utc::now();
    let dados = &ctx.store.dados;
    match acao {
        AcaoDashboard::Metricas { dias } => {
            let m = dashboard::metricas(dados, dias, agora, &ctx.jornada)?;
            ctx.saida.registro(&format!("Indicadores ({dias} dias)"), &m);
        }
        AcaoDashboard::Presenca { dias } => {
            let p = dashboard::presenca_semanal(dados, dias, agora, &ctx.jornada)?;
            let linhas: Vec<Vec<String>> = p
                .dias
                .iter()
                .map(|d| {
                    vec![
                        d.dia.clone(),
                        format!("{}%", d.presente),
                        format!("{}%", d.parcial),
                        format!("{}%", d.ausente),
                    ]
                })
                .collect();
            ctx.saida.tabela(&["Dia", "Presente", "Parcial", "Ausente"], &linhas, &p);
        }
        AcaoDashboard::Headcount => {
            let h = dashboard::headcount(dados);
            let linhas: Vec<Vec<String>> = h
                .iter()
                .map(|d| vec![d.departamento.clone(), d.atual.to_string(), d.planejado.to_string()])
                .collect();
            ctx.saida.tabela(&["Departamento", "Atual", "Planejado"], &linhas, &h);
        }
        AcaoDashboard::Acoes { limite } => {
            let acoes = dashboard::acoes_imediatas(dados, limite, &ctx.jornada);
            let linhas: Vec<Vec<String>> = acoes
                .iter()
                .map(|a| {
                    vec![
                        texto(a.colaborador_nome.as_deref()),
                        a.descricao.clone(),
                        a.urgencia.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string()),
                        a.id.clone(),
                    ]
                })
                .collect();
            ctx.saida.tabela(&["Colaborador", "Ação", "Urgência", "Id"], &linhas, &acoes);
        }
    }
    Ok(())
}

async fn cmd_imagem(ctx: &Contexto, caminho: &str, destino: &Path) -> Result<()> {
    let relogio = ctx.relogio()?;
    let progresso = Progresso::iniciar(&format!("Baixando {caminho}..."), ctx.saida.json());
    let (bytes, content_type) = match relogio.baixar_imagem(caminho).await {
        Ok(imagem) => {
            progresso.concluir("Imagem baixada");
            imagem
        }
        Err(e) => {
            progresso.falhar("Falha ao baixar a imagem");
            return Err(e);
        }
    };
    std::fs::write(destino, &bytes).with_context(|| format!("Falha ao gravar {}", destino.display()))?;
    ctx.saida.sucesso(
        &format!("{} ({content_type}, {} bytes)", destino.display(), bytes.len()),
        &serde_json::json!({
            "path": caminho,
            "content_type": content_type,
            "bytes": bytes.len(),
            "saida": destino,
        }),
    );
    Ok(())
}
