// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor page — image preview with a freehand drawing overlay and the
// action toolbar.

use dioxus::prelude::*;

use retusche_core::human_errors::Severity;
use retusche_core::{EditAction, MaskMode, Point};

use crate::services::app_services::AppServices;
use crate::session::EditSession;
use crate::state::{AppState, StatusMessage};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

#[component]
pub fn Editor() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    // Snapshot what the view needs so no read guard is held by handlers.
    let (has_image, subtitle, dims, preview, lines, status, stroke_px) = {
        let st = state.read();
        let lines: Vec<String> = st
            .recorder
            .strokes()
            .iter()
            .map(|s| svg_points(s.points()))
            .chain(
                st.recorder
                    .is_drawing()
                    .then(|| svg_points(st.recorder.active_points())),
            )
            .collect();
        let stroke_px = match st.config.mask_mode {
            MaskMode::Brush => st.config.stroke_width,
            MaskMode::Lasso => 2,
        };
        (
            st.session.is_some(),
            match st.session.as_ref() {
                Some(s) => format!("Editing {}", s.name()),
                None => "Open an image to start.".to_string(),
            },
            st.session.as_ref().map(EditSession::dimensions),
            st.preview.clone(),
            lines,
            st.status
                .as_ref()
                .map(|m| (m.text.clone(), status_colour(m.severity))),
            stroke_px,
        )
    };

    rsx! {
        div {
            h1 { "Retusche" }
            p { style: "color: #666;", "{subtitle}" }

            // Open file
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                onclick: move |_| {
                    let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file()
                    else {
                        return;
                    };
                    let next = match EditSession::open(&path) {
                        Ok(session) => {
                            let (w, h) = session.dimensions();
                            tracing::info!(file = %session.name(), width = w, height = h, "image opened");
                            let msg = StatusMessage::info(format!("Opened {} ({w}\u{00D7}{h})", session.name()));
                            state.read().with_session(session, msg)
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "open failed");
                            state.read().with_status(StatusMessage::from_error(&e))
                        }
                    };
                    state.set(next);
                },
                "Open Image"
            }

            // Toolbar
            div { style: "display: flex; gap: 8px; flex-wrap: wrap; margin: 12px 0;",
                for action in EditAction::ALL {
                    ToolButton {
                        key: "{action.mode()}",
                        label: action.label(),
                        disabled: !has_image,
                        onclick: move |_| {
                            let next = state.read().dispatch(action);
                            state.set(next);
                        },
                    }
                }
            }

            if let (Some(src), Some((w, h))) = (preview, dims) {
                div { style: "position: relative; display: inline-block; border: 1px solid #ccc; background: repeating-conic-gradient(#eee 0% 25%, white 0% 50%) 50% / 16px 16px; cursor: crosshair;",
                    img {
                        src: "{src}",
                        width: "{w}",
                        height: "{h}",
                        style: "display: block; max-width: none; user-select: none;",
                        draggable: "false",
                    }
                    svg {
                        width: "{w}",
                        height: "{h}",
                        view_box: "0 0 {w} {h}",
                        style: "position: absolute; left: 0; top: 0;",
                        onmousedown: move |evt: MouseEvent| {
                            state.write().press(to_point(&evt));
                        },
                        onmousemove: move |evt: MouseEvent| {
                            if state.read().recorder.is_drawing() {
                                state.write().drag(to_point(&evt));
                            }
                        },
                        onmouseup: move |_| state.write().release(),
                        onmouseleave: move |_| state.write().release(),
                        for (i, pts) in lines.iter().enumerate() {
                            polyline {
                                key: "{i}",
                                points: "{pts}",
                                fill: "none",
                                stroke: "white",
                                stroke_width: "{stroke_px}",
                                stroke_linecap: "round",
                                stroke_linejoin: "round",
                                style: "pointer-events: none;",
                            }
                        }
                    }
                }

                div { style: "display: flex; gap: 8px; margin: 12px 0;",
                    ToolButton {
                        label: "Clear Strokes",
                        disabled: lines.is_empty(),
                        onclick: move |_| state.write().clear_strokes(),
                    }
                    ToolButton {
                        label: "Reset",
                        disabled: false,
                        onclick: move |_| {
                            let next = state.read().reset();
                            state.set(next);
                        },
                    }
                }

                // Save
                button {
                    style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white; font-size: 16px; margin-top: 16px;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let mut dialog = rfd::FileDialog::new()
                                .add_filter("PNG", &["png"])
                                .set_file_name("edited.png");
                            if let Some(dir) = svc.exports_dir() {
                                dialog = dialog.set_directory(dir);
                            }
                            let Some(path) = dialog.save_file() else {
                                return;
                            };
                            let result = match state.read().session.as_ref() {
                                Some(session) => session.save_png(&path),
                                None => return,
                            };
                            let msg = match result {
                                Ok(()) => StatusMessage::info(format!("Saved to {}", path.display())),
                                Err(e) => {
                                    tracing::error!(error = %e, "save failed");
                                    StatusMessage::from_error(&e)
                                }
                            };
                            let next = state.read().with_status(msg);
                            state.set(next);
                        }
                    },
                    "Save PNG"
                }
            }

            // Status
            if let Some((text, colour)) = status {
                p { style: "margin-top: 8px; color: {colour}; font-size: 14px; text-align: center;",
                    "{text}"
                }
            }
        }
    }
}

#[component]
fn ToolButton(label: &'static str, disabled: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let opacity = if disabled { "0.5" } else { "1" };
    rsx! {
        button {
            style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px; opacity: {opacity};",
            disabled: disabled,
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

fn to_point(evt: &MouseEvent) -> Point {
    let p = evt.element_coordinates();
    Point::new(p.x as f32, p.y as f32)
}

/// SVG `points` attribute for a stroke.
fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_colour(severity: Option<Severity>) -> &'static str {
    match severity {
        None => "#34c759",
        Some(Severity::ActionRequired) => "#ff9500",
        Some(Severity::Permanent) => "#ff3b30",
        Some(Severity::Transient) => "#666",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_points_joins_pairs() {
        let pts = [Point::new(1.0, 2.0), Point::new(3.5, 4.0)];
        assert_eq!(svg_points(&pts), "1,2 3.5,4");
        assert_eq!(svg_points(&[]), "");
    }

    #[test]
    fn success_is_green() {
        assert_eq!(status_colour(None), "#34c759");
        assert_eq!(status_colour(Some(Severity::Permanent)), "#ff3b30");
    }
}
