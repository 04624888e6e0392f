mod config;
mod game;

use crate::config::TuningConfig;
use crate::game::state::TimerCommand;
use crate::game::Game;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{KeyboardEvent, Request, RequestInit, RequestMode, Response};

thread_local! {
    static GAME: RefCell<Option<Game>> = RefCell::new(None);
    // The countdown interval handle. At most one may be live; every start
    // clears the previous one first.
    static COUNTDOWN: RefCell<Option<(i32, Closure<dyn FnMut()>)>> = RefCell::new(None);
}

fn new_seed() -> u64 {
    js_sys::Date::now() as u64 ^ (js_sys::Math::random() * 1e9) as u64
}

#[wasm_bindgen]
pub async fn init_game() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let mut tuning: Option<TuningConfig> = None;
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let config_request = Request::new_with_str_and_init("/assets/config.json", &opts)?;
    let config_resp_value = JsFuture::from(window.fetch_with_request(&config_request)).await;

    if let Ok(resp_value) = config_resp_value {
        let resp: Response = resp_value.dyn_into()?;
        if resp.ok() {
            let json_promise = resp.json()?;
            let json = JsFuture::from(json_promise).await?;
            if let Ok(c) = serde_wasm_bindgen::from_value(json) {
                tuning = Some(c);
            }
        }
    }

    let game = Game::new(tuning, new_seed());
    GAME.with(|g| *g.borrow_mut() = Some(game));

    // Input handling
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.repeat() {
            return;
        }
        GAME.with(|g| {
            if let Some(game) = g.borrow_mut().as_mut() {
                let handled = match event.key().as_str() {
                    "ArrowLeft" => {
                        game.controls.move_left = true;
                        true
                    }
                    "ArrowRight" => {
                        game.controls.move_right = true;
                        true
                    }
                    "ArrowUp" => {
                        game.controls.accelerate = true;
                        true
                    }
                    "ArrowDown" => {
                        game.controls.decelerate = true;
                        true
                    }
                    " " => {
                        game.controls.jump = true;
                        true
                    }
                    "Enter" => {
                        game.begin();
                        true
                    }
                    "r" | "R" => {
                        if game.session.phase == crate::game::state::Phase::GameOver {
                            game.restart(new_seed());
                        }
                        true
                    }
                    _ => false,
                };
                if handled {
                    event.prevent_default();
                }
            }
        });
    }) as Box<dyn FnMut(_)>);

    let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        GAME.with(|g| {
            if let Some(game) = g.borrow_mut().as_mut() {
                match event.key().as_str() {
                    "ArrowUp" => game.controls.accelerate = false,
                    "ArrowDown" => game.controls.decelerate = false,
                    _ => {}
                }
            }
        });
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
    keydown.forget();
    keyup.forget();

    // Game loop
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();
    let last_time = Rc::new(RefCell::new(js_sys::Date::now()));

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = js_sys::Date::now();
        let dt = ((now - *last_time.borrow()) / 1000.0) as f32;
        *last_time.borrow_mut() = now;

        let mut timer_command = None;
        GAME.with(|game| {
            if let Some(game) = game.borrow_mut().as_mut() {
                game.tick(dt);
                timer_command = game.take_timer_command();
                update_ui(game);
            }
        });
        match timer_command {
            Some(TimerCommand::Start) => start_countdown(),
            Some(TimerCommand::Stop) => stop_countdown(),
            None => {}
        }
        request_animation_frame(f.borrow().as_ref().unwrap());
    }) as Box<dyn FnMut()>));

    request_animation_frame(g.borrow().as_ref().unwrap());

    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        window
            .request_animation_frame(f.as_ref().unchecked_ref())
            .ok();
    }
}

/// Install the 1-second countdown tick, cancelling any prior interval so
/// two can never decrement the same session.
fn start_countdown() {
    stop_countdown();

    let callback = Closure::wrap(Box::new(move || {
        GAME.with(|g| {
            if let Some(game) = g.borrow_mut().as_mut() {
                game.second_tick();
            }
        });
        // A resulting Stop command is picked up by the frame loop
    }) as Box<dyn FnMut()>);

    if let Some(window) = web_sys::window() {
        if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            1000,
        ) {
            COUNTDOWN.with(|c| *c.borrow_mut() = Some((id, callback)));
        }
    }
}

fn stop_countdown() {
    COUNTDOWN.with(|c| {
        if let Some((id, _closure)) = c.borrow_mut().take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
    });
}

fn update_ui(game: &Game) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            let hud = game.snapshot().hud;
            if let Some(el) = document.get_element_by_id("score") {
                el.set_inner_html(&format!("Score: {} | Coins: {}", hud.score, hud.coins));
            }
            if let Some(el) = document.get_element_by_id("timer") {
                el.set_inner_html(&format!("Time: {}", hud.remaining_time as i32));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_inner_html(&format!("Level {}", hud.level));
            }
            if let Some(el) = document.get_element_by_id("speed") {
                el.set_inner_html(&format!("{:.0} u/s", hud.speed));
            }
            if let Some(el) = document.get_element_by_id("distance") {
                el.set_inner_html(&format!("{:.0}m to go", hud.distance_left));
            }
            if let Some(el) = document.get_element_by_id("gameover") {
                let style = if hud.phase == crate::game::state::Phase::GameOver {
                    "display: block;"
                } else {
                    "display: none;"
                };
                el.set_attribute("style", style).ok();
            }
        }
    }
}

#[wasm_bindgen]
pub fn begin_game() {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.begin();
        }
    });
}

#[wasm_bindgen]
pub fn restart_game() {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.restart(new_seed());
        }
    });
}

#[wasm_bindgen]
pub fn touch_left() {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.controls.move_left = true;
        }
    });
}

#[wasm_bindgen]
pub fn touch_right() {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.controls.move_right = true;
        }
    });
}

#[wasm_bindgen]
pub fn touch_jump() {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.controls.jump = true;
        }
    });
}

#[wasm_bindgen]
pub fn touch_accelerate(pressed: bool) {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.controls.accelerate = pressed;
        }
    });
}

#[wasm_bindgen]
pub fn touch_brake(pressed: bool) {
    GAME.with(|g| {
        if let Some(game) = g.borrow_mut().as_mut() {
            game.controls.decelerate = pressed;
        }
    });
}

/// Entity positions and HUD state for the JS renderer, one call per frame.
#[wasm_bindgen]
pub fn frame_snapshot() -> JsValue {
    GAME.with(|g| {
        g.borrow()
            .as_ref()
            .and_then(|game| serde_wasm_bindgen::to_value(&game.snapshot()).ok())
            .unwrap_or(JsValue::NULL)
    })
}
