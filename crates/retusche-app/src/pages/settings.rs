// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent editor configuration.

use std::str::FromStr;

use dioxus::prelude::*;

use retusche_core::MaskMode;
use retusche_core::human_errors::humanize_error;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<(String, &'static str)>::None);

    let config = state.read().config.clone();

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Adjustments" }
                NumberRow {
                    label: "Brightness factor",
                    value: config.brightness_factor.to_string(),
                    step: "0.1",
                    on_change: move |v: String| {
                        if let Some(f) = parse_non_negative::<f32>(&v) {
                            state.write().config.brightness_factor = f;
                        }
                    },
                }
                NumberRow {
                    label: "Blur radius (sigma)",
                    value: config.blur_sigma.to_string(),
                    step: "0.5",
                    on_change: move |v: String| {
                        if let Some(s) = parse_non_negative::<f32>(&v)
                            && s > 0.0
                        {
                            state.write().config.blur_sigma = s;
                        }
                    },
                }
                NumberRow {
                    label: "Background tolerance",
                    value: config.tolerance.to_string(),
                    step: "1",
                    on_change: move |v: String| {
                        if let Some(t) = parse_non_negative::<f64>(&v) {
                            state.write().config.tolerance = t;
                        }
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Drawing" }
                NumberRow {
                    label: "Stroke width (px)",
                    value: config.stroke_width.to_string(),
                    step: "1",
                    on_change: move |v: String| {
                        if let Ok(w) = v.trim().parse::<u32>()
                            && w > 0
                        {
                            state.write().config.stroke_width = w;
                        }
                    },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Mask mode" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: mask_mode_label(config.mask_mode),
                        onchange: move |evt| {
                            if let Some(mode) = mask_mode_from_label(&evt.value()) {
                                state.write().config.mask_mode = mode;
                            }
                        },
                        option { value: "Brush", "Brush (keep painted area)" }
                        option { value: "Lasso", "Lasso (keep enclosed area)" }
                    }
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some(("Settings saved.".into(), save_colour(true))));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some((humanize_error(&e).to_string(), save_colour(false))));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 16px; margin-top: 8px;",
                onclick: move |_| {
                    state.write().config = Default::default();
                    save_msg.set(None);
                },
                "Restore Defaults"
            }
            if let Some((ref msg, colour)) = *save_msg.read() {
                p { style: "color: {colour}; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Retusche v0.1.0"
                    br {}
                    "Small Image Retouching Tool"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn NumberRow(
    label: &'static str,
    value: String,
    step: &'static str,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "number",
                min: "0",
                step: step,
                style: "width: 90px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
            }
        }
    }
}

fn parse_non_negative<T>(s: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let v = s.trim().parse::<T>().ok()?;
    // NaN fails this comparison as well
    (v >= T::default()).then_some(v)
}

fn save_colour(ok: bool) -> &'static str {
    if ok { "#34c759" } else { "#ff3b30" }
}

fn mask_mode_label(mode: MaskMode) -> &'static str {
    match mode {
        MaskMode::Brush => "Brush",
        MaskMode::Lasso => "Lasso",
    }
}

fn mask_mode_from_label(label: &str) -> Option<MaskMode> {
    match label {
        "Brush" => Some(MaskMode::Brush),
        "Lasso" => Some(MaskMode::Lasso),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_mode_labels_round_trip() {
        for mode in [MaskMode::Brush, MaskMode::Lasso] {
            assert_eq!(mask_mode_from_label(mask_mode_label(mode)), Some(mode));
        }
        assert_eq!(mask_mode_from_label("Eraser"), None);
    }

    #[test]
    fn negative_and_garbage_inputs_rejected() {
        assert_eq!(parse_non_negative::<f32>(" 1.5 "), Some(1.5));
        assert_eq!(parse_non_negative::<f64>("0"), Some(0.0));
        assert_eq!(parse_non_negative::<f32>("-2"), None);
        assert_eq!(parse_non_negative::<f32>("NaN"), None);
        assert_eq!(parse_non_negative::<f64>("abc"), None);
    }
}
