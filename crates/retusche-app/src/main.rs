// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Retusche — Small Image Retouching Tool
//
// Entry point. Initialises logging, then either runs a single command-line
// edit or launches the Dioxus desktop editor.

mod cli;
mod pages;
mod services;
mod session;
mod state;

use std::process::ExitCode;

use clap::Parser;
use dioxus::prelude::*;
use retusche_core::human_errors::humanize_error;

use cli::{Cli, Command};
use pages::editor::Editor;
use pages::settings::Settings;
use services::app_services::{AppServices, read_config_file};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Apply(args)) => {
            let base = match &args.config {
                Some(path) => read_config_file(path),
                None => Ok(AppServices::init()
                    .map(|svc| svc.config())
                    .unwrap_or_default()),
            };
            match base.and_then(|config| cli::run(&args, config)) {
                Ok(outcome) => {
                    tracing::debug!(?outcome, "apply finished");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "apply failed");
                    eprintln!("{}", humanize_error(&e));
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            tracing::info!("Retusche starting");
            dioxus::launch(app);
            ExitCode::SUCCESS
        }
    }
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Editor {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!("app services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "data directory unavailable, settings will not persist");
            AppServices::fallback()
        }
    });

    // Provide services and state as context for all pages
    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(svc.config())));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent bottom tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            div { class: "page-content",
                style: "flex: 1; overflow: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Editor {}, label: "Editor", icon: "E" }
                TabButton { to: Route::Settings {}, label: "Settings", icon: "S" }
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
