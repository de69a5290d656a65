use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::export::ExportSettings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port the API listens on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding per-session conversation files
    #[arg(long, env = "MEMORY_DIR")]
    pub memory_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the Twin API server (default).
    Serve,
    /// Write the static front-end bundle.
    Export {
        /// Output directory, overrides `export.out_dir`
        #[arg(long)]
        out_dir: Option<String>,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub persona: PersonaConfig,
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Comma separated list of allowed CORS origins.
    pub cors_origins: String,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub azure_deployment: Option<String>,
    #[serde(default)]
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MemoryConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersonaConfig {
    /// Directory holding `facts.json`, `summary.txt`, `style.txt`, `linkedin.txt`.
    pub dir: PathBuf,
    /// Single-file personality used when no structured profile exists.
    pub personality_file: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<(Self, Command), config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<(Self, Command), config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        let command = cli.command.clone().unwrap_or(Command::Serve);

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.cors_origins", "http://localhost:3000")?
            .set_default("server.request_timeout_secs", 60)?
            .set_default("llm.base_url", "https://api.openai.com")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("memory.dir", "../memory")?
            .set_default("persona.dir", "data")?
            .set_default("persona.personality_file", "me.txt")?
            .set_default("export.output", "export")?
            .set_default("export.images.unoptimized", true)?
            .set_default("export.out_dir", "out")?
            .set_default("export.public_dir", "public")?
            .set_default("export.api_url", "http://localhost:8000")?;

        // 2. Config file: explicit path, else ./config.yaml when present
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml"));
        }

        // 3. Legacy environment names, below the prefixed ones
        let mut legacy = config::Map::new();
        if let Ok(val) = env::var("CORS_ORIGINS") {
            legacy.insert("server__cors_origins".to_string(), val);
        }
        if let Ok(val) = env::var("OPENAI_API_KEY")
            && !val.trim().is_empty()
        {
            legacy.insert("llm__api_key".to_string(), val);
        }
        builder = builder.add_source(Environment::default().separator("__").source(Some(legacy)));

        // 4. Prefixed environment, e.g. TWIN_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("TWIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 5. CLI flags (clap also resolves their env aliases)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(dir) = &cli.memory_dir {
            builder = builder.set_override("memory.dir", dir.as_str())?;
        }
        if let Command::Export {
            out_dir: Some(dir),
        } = &command
        {
            builder = builder.set_override("export.out_dir", dir.as_str())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        Ok((cfg, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origins_split_and_trimmed() {
        let server = ServerConfig {
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_origins: "http://a.test, https://b.test,,".to_string(),
            request_timeout_secs: 60,
        };
        assert_eq!(server.origins(), vec!["http://a.test", "https://b.test"]);
    }
}
