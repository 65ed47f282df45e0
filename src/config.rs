//! Configuração do rhponto carregada a partir de `rhponto.toml`.
//!
//! A struct [`RhConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! Variáveis de ambiente têm precedência sobre o arquivo.

use anyhow::Result;
use chrono::{FixedOffset, NaiveTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::ponto::Jornada;

/// Arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "rhponto.toml";

/// Configuração de nível superior carregada de `rhponto.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RhConfig {
    /// Caminho do arquivo JSON com os dados.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// URL base do serviço de reconhecimento facial.
    #[serde(default = "default_face_recognition_url")]
    pub face_recognition_url: String,

    /// URL WebDAV do Nextcloud (até a pasta do usuário).
    #[serde(default = "default_nextcloud_webdav_url")]
    pub nextcloud_webdav_url: String,

    #[serde(default)]
    pub nextcloud_user: String,

    #[serde(default)]
    pub nextcloud_password: String,

    /// URL pública da aplicação, usada para montar as URLs de proxy de imagem.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Deslocamento fixo em horas do horário local em relação a UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Jornada diária esperada em minutos.
    #[serde(default = "default_jornada_minutos")]
    pub jornada_minutos: i64,

    /// Horário de início do expediente (HH:MM); entradas depois disso contam como atraso.
    #[serde(default = "default_inicio_expediente")]
    pub inicio_expediente: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Tamanho máximo de imagens enviadas (avatar e facial).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("rhponto.json")
}

fn default_face_recognition_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_nextcloud_webdav_url() -> String {
    "http://localhost/remote.php/dav/files/Ponto".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

// Brasília, sem horário de verão.
fn default_utc_offset_hours() -> i32 {
    -3
}

fn default_jornada_minutos() -> i64 {
    8 * 60
}

fn default_inicio_expediente() -> String {
    "08:00".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for RhConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            face_recognition_url: default_face_recognition_url(),
            nextcloud_webdav_url: default_nextcloud_webdav_url(),
            nextcloud_user: String::new(),
            nextcloud_password: String::new(),
            app_url: default_app_url(),
            utc_offset_hours: default_utc_offset_hours(),
            jornada_minutos: default_jornada_minutos(),
            inicio_expediente: default_inicio_expediente(),
            http_timeout_secs: default_http_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl RhConfig {
    /// Carrega a configuração de `rhponto.toml` no diretório atual.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RhConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        if config.nextcloud_user.is_empty() || config.nextcloud_password.is_empty() {
            warn!("Credenciais do Nextcloud não configuradas; uploads de arquivos não vão funcionar");
        }

        Ok(config)
    }

    // Variáveis de ambiente têm precedência sobre o arquivo de configuração.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("FACE_RECOGNITION_API_URL") {
            self.face_recognition_url = v;
        }
        if let Some(v) = get("NEXTCLOUD_WEBDAV_URL") {
            self.nextcloud_webdav_url = v;
        }
        if let Some(v) = get("NEXTCLOUD_USER") {
            self.nextcloud_user = v;
        }
        if let Some(v) = get("NEXTCLOUD_PASSWORD") {
            self.nextcloud_password = v;
        }
        if let Some(v) = get("RHPONTO_APP_URL") {
            self.app_url = v;
        }
        if let Some(v) = get("RHPONTO_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
    }

    fn validate(&self) -> Result<()> {
        self.offset()?;
        self.inicio_expediente()?;
        if self.jornada_minutos <= 0 {
            anyhow::bail!("jornada_minutos deve ser positiva");
        }
        Ok(())
    }

    /// Fuso horário local como deslocamento fixo.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!("utc_offset_hours inválido: {}", self.utc_offset_hours)
            })
    }

    pub fn inicio_expediente(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.inicio_expediente, "%H:%M").map_err(|e| {
            anyhow::anyhow!("inicio_expediente inválido ({}): {e}", self.inicio_expediente)
        })
    }

    /// Regras de jornada usadas pela apuração de frequência.
    pub fn jornada(&self) -> Result<Jornada> {
        Ok(Jornada {
            offset: self.offset()?,
            inicio_expediente: self.inicio_expediente()?,
            minutos_esperados: self.jornada_minutos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_values() {
        let config = RhConfig::default();
        assert_eq!(config.data_file, PathBuf::from("rhponto.json"));
        assert_eq!(config.face_recognition_url, "http://localhost:9090");
        assert_eq!(config.jornada_minutos, 480);
        assert_eq!(config.utc_offset_hours, -3);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.nextcloud_user.is_empty());
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        for horas in [i32::MAX, i32::MIN, 24, -24] {
            let config = RhConfig {
                utc_offset_hours: horas,
                ..RhConfig::default()
            };
            assert!(config.offset().is_err(), "offset {horas} accepted");
        }
        let config = RhConfig {
            utc_offset_hours: 5,
            ..RhConfig::default()
        };
        assert_eq!(config.offset().unwrap().local_minus_utc(), 5 * 3600);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            face_recognition_url = "http://faces:9090"
            jornada_minutos = 360
        "#;
        let config: RhConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.face_recognition_url, "http://faces:9090");
        assert_eq!(config.jornada_minutos, 360);
        assert_eq!(config.inicio_expediente, "08:00");
        assert_eq!(config.app_url, "http://localhost:3000");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = RhConfig::default();
        let env: HashMap<&str, &str> = [
            ("FACE_RECOGNITION_API_URL", "http://env-faces:1"),
            ("NEXTCLOUD_USER", "ponto"),
            ("NEXTCLOUD_PASSWORD", ""),
        ]
        .into_iter()
        .collect();

        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.face_recognition_url, "http://env-faces:1");
        assert_eq!(config.nextcloud_user, "ponto");
        // Valores vazios não sobrescrevem.
        assert!(config.nextcloud_password.is_empty());
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RhConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.jornada_minutos, 480);
    }

    #[test]
    fn load_rejects_bad_start_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rhponto.toml");
        std::fs::write(&path, "inicio_expediente = \"8h\"\n").unwrap();
        assert!(RhConfig::load_from(&path).is_err());
    }

    #[test]
    fn offset_and_start_time_parse() {
        let config = RhConfig::default();
        assert_eq!(config.offset().unwrap().local_minus_utc(), -3 * 3600);
        assert_eq!(
            config.inicio_expediente().unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
    }
}
