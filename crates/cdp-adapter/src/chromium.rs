//! Chromium-backed page handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, InsertTextParams, MouseButton as CdpMouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CdpConfig;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::keys::{parse_chord, KeyDefinition};
use crate::page::{BrowserPage, MouseButton};

/// A launched Chromium process with a single page.
pub struct ChromiumBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Arc<ChromiumPage>,
}

impl ChromiumBrowser {
    pub async fn launch(cfg: CdpConfig) -> Result<Self, AdapterError> {
        let viewport = Viewport {
            width: cfg.viewport_width,
            height: cfg.viewport_height,
            ..Default::default()
        };
        let mut builder = BrowserConfig::builder()
            .window_size(cfg.viewport_width, cfg.viewport_height)
            .viewport(viewport)
            .launch_timeout(Duration::from_millis(cfg.launch_timeout_ms));
        if !cfg.headless {
            builder = builder.with_head();
        }
        if let Some(path) = cfg.executable.as_ref() {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder
            .build()
            .map_err(|err| AdapterError::new(AdapterErrorKind::Launch).with_hint(err))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::Launch).with_hint(err.to_string())
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(target: "cdp-adapter", ?err, "cdp handler stopped");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(AdapterError::cdp)?;

        info!(
            target: "cdp-adapter",
            headless = cfg.headless,
            width = cfg.viewport_width,
            height = cfg.viewport_height,
            "chromium launched"
        );

        Ok(Self {
            browser,
            handler,
            page: Arc::new(ChromiumPage { page }),
        })
    }

    pub fn page(&self) -> Arc<ChromiumPage> {
        Arc::clone(&self.page)
    }

    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            warn!(target: "cdp-adapter", %err, "failed to close browser cleanly");
        }
        if let Err(err) = self.browser.wait().await {
            debug!(target: "cdp-adapter", %err, "browser process wait failed");
        }
        self.handler.abort();
        info!(target: "cdp-adapter", "chromium closed");
    }
}

pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn dispatch_mouse(
        &self,
        kind: DispatchMouseEventType,
        x: f64,
        y: f64,
        button: Option<CdpMouseButton>,
    ) -> Result<(), AdapterError> {
        let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
        if let Some(button) = button {
            builder = builder.button(button).click_count(1);
        }
        let params = builder.build().map_err(AdapterError::cdp)?;
        self.page.execute(params).await.map_err(AdapterError::cdp)?;
        Ok(())
    }

    async fn dispatch_key(
        &self,
        kind: DispatchKeyEventType,
        def: &KeyDefinition,
        modifiers: i64,
        text: Option<&str>,
    ) -> Result<(), AdapterError> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(def.key.clone())
            .code(def.code.clone())
            .windows_virtual_key_code(def.key_code)
            .native_virtual_key_code(def.key_code)
            .modifiers(modifiers);
        if let Some(text) = text {
            builder = builder.text(text.to_string());
        }
        let params = builder.build().map_err(AdapterError::cdp)?;
        self.page.execute(params).await.map_err(AdapterError::cdp)?;
        Ok(())
    }
}

fn cdp_button(button: MouseButton) -> CdpMouseButton {
    match button {
        MouseButton::Left => CdpMouseButton::Left,
        MouseButton::Right => CdpMouseButton::Right,
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), AdapterError> {
        self.page.goto(url).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::Navigation).with_hint(format!("{url}: {err}"))
        })?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, AdapterError> {
        let url = self.page.url().await.map_err(AdapterError::cdp)?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn mouse_click(&self, x: f64, y: f64, button: MouseButton) -> Result<(), AdapterError> {
        let button = cdp_button(button);
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, x, y, None)
            .await?;
        self.dispatch_mouse(
            DispatchMouseEventType::MousePressed,
            x,
            y,
            Some(button.clone()),
        )
        .await?;
        self.dispatch_mouse(DispatchMouseEventType::MouseReleased, x, y, Some(button))
            .await
    }

    async fn mouse_move(&self, x: f64, y: f64) -> Result<(), AdapterError> {
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, x, y, None)
            .await
    }

    async fn type_text(&self, text: &str) -> Result<(), AdapterError> {
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(AdapterError::cdp)?;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), AdapterError> {
        let chord = parse_chord(key)?;
        let mut held = 0;
        for modifier in &chord.modifiers {
            held |= modifier.modifier_bit();
            self.dispatch_key(DispatchKeyEventType::RawKeyDown, modifier, held, None)
                .await?;
        }

        let text = chord.text();
        let down = if text.is_some() {
            DispatchKeyEventType::KeyDown
        } else {
            DispatchKeyEventType::RawKeyDown
        };
        self.dispatch_key(down, &chord.key, held, text.as_deref())
            .await?;
        self.dispatch_key(DispatchKeyEventType::KeyUp, &chord.key, held, None)
            .await?;

        for modifier in chord.modifiers.iter().rev() {
            held &= !modifier.modifier_bit();
            self.dispatch_key(DispatchKeyEventType::KeyUp, modifier, held, None)
                .await?;
        }
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, AdapterError> {
        let result = self.page.evaluate(expression).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::Script).with_hint(err.to_string())
        })?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, AdapterError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();
        self.page.screenshot(params).await.map_err(AdapterError::cdp)
    }
}
