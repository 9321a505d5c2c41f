use std::path::{Path, PathBuf};
use std::sync::Arc;

use agent_core::computer::{ComputerUseProvider, OpenAiComputerUse};
use agent_core::util::secret_prefix;
use agent_core::{OpenAiConfig, OpenAiLlmProvider, Runner};
use anyhow::Result;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::tools::WebSearch;

pub struct CliContext {
    config: Arc<AppConfig>,
    config_path: PathBuf,
}

impl CliContext {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn openai_config(&self) -> Result<OpenAiConfig> {
        let openai = self.config.openai_config()?;
        debug!(
            key = %secret_prefix(&openai.api_key),
            api_base = %openai.api_base,
            "OpenAI credentials resolved"
        );
        Ok(openai)
    }

    /// Agent runner backed by the chat completions API.
    pub fn runner(&self) -> Result<Runner> {
        let provider = OpenAiLlmProvider::new(self.openai_config()?)?;
        Ok(Runner::new(Arc::new(provider), self.config.run_config()))
    }

    /// Client for the computer-use model.
    pub fn computer_use(&self) -> Result<Arc<dyn ComputerUseProvider>> {
        Ok(Arc::new(OpenAiComputerUse::new(self.openai_config()?)?))
    }

    pub fn web_search(&self) -> Arc<WebSearch> {
        let search = WebSearch::new(self.config.search.serpapi_key.clone());
        if !search.has_credential() {
            info!("SERPAPI_KEY not set; web search returns placeholder results");
        }
        Arc::new(search)
    }
}
