//! Saída de terminal do rhponto: spinners, tabelas e JSON.
//!
//! Usa `indicatif` para o spinner das chamadas HTTP e `console` para cores e
//! alinhamento. Com `--json`, tudo que vai para stdout é JSON.

use std::time::Duration;

use console::{measure_text_width, pad_str, Alignment, Style};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Spinner exibido enquanto um serviço externo responde.
pub struct Progresso {
    pb: ProgressBar,
    green: Style,
    red: Style,
}

impl Progresso {
    /// Inicia o spinner; com `oculto` nada é desenhado (saída JSON).
    pub fn iniciar(mensagem: &str, oculto: bool) -> Self {
        let pb = if oculto {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(mensagem.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    pub fn concluir(&self, mensagem: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("  {} {mensagem}", self.green.apply_to("✓"));
        }
    }

    pub fn falhar(&self, mensagem: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("  {} {mensagem}", self.red.apply_to("✗"));
        }
    }
}

/// Escreve resultados de comandos em stdout.
pub struct Saida {
    json: bool,
    green: Style,
    yellow: Style,
    header: Style,
}

impl Saida {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            header: Style::new().cyan().bold(),
        }
    }

    pub fn json(&self) -> bool {
        self.json
    }

    fn imprimir_json<T: Serialize>(&self, valor: &T) {
        println!("{}", serde_json::to_string_pretty(valor).unwrap_or_default());
    }

    /// Um registro: em modo texto, título seguido do JSON formatado.
    pub fn registro<T: Serialize>(&self, titulo: &str, valor: &T) {
        if !self.json {
            println!("{}", self.header.apply_to(format!("─── {titulo} ───")));
        }
        self.imprimir_json(valor);
    }

    /// Mensagem de sucesso com o registro afetado.
    pub fn sucesso<T: Serialize>(&self, mensagem: &str, valor: &T) {
        if self.json {
            self.imprimir_json(valor);
        } else {
            println!("  {} {mensagem}", self.green.apply_to("✓"));
        }
    }

    pub fn aviso(&self, mensagem: &str) {
        if !self.json {
            println!("  {} {mensagem}", self.yellow.apply_to("!"));
        }
    }

    /// Tabela alinhada em modo texto; `valor` é o que sai em modo JSON.
    pub fn tabela<T: Serialize>(&self, cabecalho: &[&str], linhas: &[Vec<String>], valor: &T) {
        if self.json {
            self.imprimir_json(valor);
            return;
        }
        if linhas.is_empty() {
            self.aviso("Nenhum registro encontrado.");
            return;
        }
        print!("{}", formatar_tabela(cabecalho, linhas, &self.header));
    }
}

fn formatar_tabela(cabecalho: &[&str], linhas: &[Vec<String>], estilo: &Style) -> String {
    let mut larguras: Vec<usize> = cabecalho.iter().map(|c| measure_text_width(c)).collect();
    for linha in linhas {
        for (i, celula) in linha.iter().enumerate().take(larguras.len()) {
            larguras[i] = larguras[i].max(measure_text_width(celula));
        }
    }

    let montar = |celulas: Vec<&str>| {
        celulas
            .iter()
            .zip(&larguras)
            .map(|(c, w)| pad_str(c, *w, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("{}\n", estilo.apply_to(montar(cabecalho.to_vec())));
    for linha in linhas {
        out.push_str(&montar(linha.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabela_aligns_columns() {
        let linhas = vec![
            vec!["M0001".to_string(), "Ana".to_string()],
            vec!["M12".to_string(), "João Conceição".to_string()],
        ];
        let out = formatar_tabela(&["Matrícula", "Nome"], &linhas, &Style::new());
        let linhas: Vec<&str> = out.lines().collect();
        assert_eq!(linhas[0], "Matrícula  Nome");
        assert_eq!(linhas[1], "M0001      Ana");
        assert_eq!(linhas[2], "M12        João Conceição");
    }
}
