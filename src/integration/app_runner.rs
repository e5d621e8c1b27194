use color_eyre::eyre::{eyre, Result};
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::{json, Value};

use crate::{
    core::{
        action::{Action, ActionTree},
        registry::{LoadState, LoadStatus, Registry},
        state::AppState,
    },
    host::Host,
    infrastructure::{
        config::Config,
        modules::{counter_seed, module_table},
        tui::{Event, TuiLike},
    },
    integration::runtime::Runtime,
    lazy::{create_lazy, Lazy, Route},
    presentation::{
        view::{Region, TextView},
        widgets::StatusBarWidget,
        LogHost, TuiHost,
    },
};

/// Host state key holding the active module key
pub const ROUTE_KEY: &str = "route";
/// Host state key listing the offered module keys
pub const MODULES_KEY: &str = "modules";

/// Runtime over the configured modules, mounting into `host`.
///
/// The host view tree is a single lazy element whose key is the `route`
/// state entry; the host action `route` switches it.
pub fn build_runtime<H>(config: &Config, host: H) -> Result<Runtime<TextView, Region, H>>
where
    H: Host<TextView, Region>,
{
    let initial = config
        .initial_module()
        .ok_or_else(|| eyre!("no modules configured"))?;
    let modules = module_table(config);
    let keys = modules.sorted_keys();

    let (loader, lazy) = create_lazy(host, Region::Root).configure(modules, TextView::loading);

    let mut host_state = counter_seed(config);
    host_state.insert(ROUTE_KEY.to_string(), json!(initial));
    host_state.insert(MODULES_KEY.to_string(), json!(keys));
    let host_actions = ActionTree::new().with(ROUTE_KEY, Action::setter(ROUTE_KEY));

    log::info!("AppRunner: {} modules, starting at '{initial}'", keys.len());
    Ok(Runtime::new(
        loader,
        lazy,
        host_state,
        host_actions,
        move |state: &AppState<TextView>| {
            let route = active_module(state).unwrap_or_default();
            Lazy::new(route.clone(), json!({ "route": route }))
        },
    ))
}

fn active_module(state: &AppState<TextView>) -> Option<String> {
    state
        .get(ROUTE_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn module_keys(state: &AppState<TextView>) -> Vec<String> {
    state
        .get(MODULES_KEY)
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Footer message for the active module, if any
fn status_message(state: &AppState<TextView>, registry: &Registry<TextView>) -> Option<String> {
    let key = active_module(state)?;
    match registry.get(&key) {
        Some(LoadState::Failed(error)) => Some(error.to_string()),
        _ if state.fetching => Some(format!("loading '{key}'...")),
        _ => None,
    }
}

/// Drives the runtime from terminal events and draws the host
pub struct AppRunner<T> {
    runtime: Runtime<TextView, Region, TuiHost>,
    tui: T,
    should_quit: bool,
}

impl<T: TuiLike> AppRunner<T> {
    pub fn new(config: &Config, tui: T) -> Result<Self> {
        Ok(Self {
            runtime: build_runtime(config, TuiHost::new())?,
            tui,
            should_quit: false,
        })
    }

    pub fn runtime(&self) -> &Runtime<TextView, Region, TuiHost> {
        &self.runtime
    }

    pub fn tui(&self) -> &T {
        &self.tui
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main loop: handle terminal events and runtime messages until quit
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        self.runtime.render();
        let result = self.event_loop().await;
        self.tui.exit()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        while !self.should_quit {
            self.sync()?;
            tokio::select! {
                biased;
                Some(msg) = self.runtime.next_msg() => {
                    self.runtime.process_message(msg);
                }
                event = self.tui.next() => match event {
                    Some(event) => self.handle_event(event)?,
                    None => self.should_quit = true,
                },
            }
        }
        Ok(())
    }

    /// Apply one terminal event
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Init => {
                self.runtime.render();
            }
            Event::Render => self.draw()?,
            Event::Resize(w, h) => {
                self.tui.resize(ratatui::prelude::Rect::new(0, 0, w, h))?;
                self.draw()?;
            }
            Event::Key(key) => self.handle_key(key),
            Event::Error => log::warn!("AppRunner: terminal event error"),
            Event::Closed => self.should_quit = true,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                match module_keys(self.runtime.state()).get(index) {
                    Some(module) => {
                        self.runtime.bound_actions().call(ROUTE_KEY, json!(module));
                    }
                    None => log::debug!("AppRunner: no module at {c}"),
                }
            }
            KeyCode::Char('+') => self.increment(),
            KeyCode::Char('r') => self.retry(),
            _ => {}
        }
    }

    /// Call the first module-provided action of the mounted view
    fn increment(&self) {
        let Some(actions) = self.runtime.loader().host().bound_actions() else {
            return;
        };
        let counter = actions
            .tree()
            .names()
            .into_iter()
            .find(|name| *name != ROUTE_KEY)
            .map(str::to_string);
        match counter {
            Some(name) => {
                actions.call(&name, json!(1));
            }
            None => log::debug!("AppRunner: mounted module has no actions"),
        }
    }

    fn retry(&self) {
        let Some(module) = active_module(self.runtime.state()) else {
            return;
        };
        if self.runtime.loader().registry().status(&module) == LoadStatus::Failed {
            log::info!("AppRunner: retrying '{module}'");
            self.runtime.bound_actions().retry(module);
        }
    }

    /// Process queued messages and re-render until nothing is pending,
    /// then draw if anything changed
    pub fn sync(&mut self) -> Result<()> {
        let mut changed = self.runtime.process_pending() > 0;
        while self.runtime.render_requested() {
            self.runtime.render();
            self.runtime.process_pending();
            changed = true;
        }
        if changed {
            self.draw()?;
        }
        Ok(())
    }

    /// Wait until no module is loading, then draw
    pub async fn settle(&mut self) -> Result<Route> {
        let route = self.runtime.run_until_settled().await;
        self.draw()?;
        Ok(route)
    }

    pub fn draw(&mut self) -> Result<()> {
        let state = self.runtime.state();
        let modules = module_keys(state);
        let active = active_module(state);
        let message = status_message(state, self.runtime.loader().registry());
        let host = self.runtime.loader().host();
        let mut draw = |frame: &mut ratatui::Frame<'_>| {
            let status =
                StatusBarWidget::new(&modules, active.as_deref()).message(message.as_deref());
            host.draw(frame, status);
        };
        self.tui.draw(&mut draw)
    }
}

/// Load `modules` (or the initial module) one after another without a
/// terminal and return every mount as a line of text
pub async fn run_headless(config: &Config, modules: &[String]) -> Result<Vec<String>> {
    let mut runtime = build_runtime(config, LogHost::new())?;
    let keys = if modules.is_empty() {
        config.initial_module().into_iter().collect()
    } else {
        modules.to_vec()
    };

    for key in keys {
        runtime.bound_actions().call(ROUTE_KEY, json!(key));
        runtime.process_pending();
        let route = runtime.run_until_settled().await;
        log::info!("Headless: '{key}' -> {route}");
    }

    Ok(runtime.loader().host().lines().to_vec())
}
