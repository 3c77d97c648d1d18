extern crate console_error_panic_hook;

pub mod connection;
pub mod dom_binder;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use tably_client::controller::{ToggleClient, ToggleHandle};
use tably_client::toggle::{ReactionKind, ToggleKind, ToggleState};

use connection::FetchTransport;
use dom_binder::DomBinder;

/// Server-rendered toggle buttons carry these attributes.
pub const TOGGLE_SELECTOR: &'static str = "[data-toggle-kind][data-toggle-id]";
pub const REACTION_OPTION_SELECTOR: &'static str = "[data-reaction-option][data-toggle-id]";
pub const CSRF_META_SELECTOR: &'static str = "meta[name=\"csrf-token\"]";
pub const UNFAVORITE_CONFIRM: &'static str = "確定要取消收藏此餐廳嗎?";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(contents: &str);
}

pub fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Entry point: wires every server-rendered toggle button on the page to one
/// shared controller and spawns its pump.
#[wasm_bindgen]
pub fn bootstrap() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let document = document();
    let csrf_token = document
        .query_selector(CSRF_META_SELECTOR)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"))
        .unwrap_or_default();
    let api_base = document
        .body()
        .and_then(|body| body.get_attribute("data-api-base"))
        .unwrap_or_default();

    let transport = FetchTransport::new(&api_base, &csrf_token);
    let binder = Rc::new(RefCell::new(DomBinder::new()));
    let mut client = ToggleClient::new(transport, binder);
    let handle = client.handle();

    wire_toggle_buttons(&document, &handle);
    wire_reaction_options(&document, &handle);

    wasm_bindgen_futures::spawn_local(async move {
        client.run().await;
    });

    log("toggle client ready");
}

/// Seeds initial state from the rendered page and attaches click handlers.
pub fn wire_toggle_buttons(document: &Document, handle: &ToggleHandle) {
    let buttons = document.query_selector_all(TOGGLE_SELECTOR).unwrap();

    for index in 0..buttons.length() {
        let element: Element = match buttons.item(index).and_then(|node| node.dyn_into().ok()) {
            Some(element) => element,
            None => continue,
        };
        let kind = match element
            .get_attribute("data-toggle-kind")
            .as_deref()
            .and_then(ToggleKind::from_attr)
        {
            Some(kind) => kind,
            None => continue,
        };
        let id = match element.get_attribute("data-toggle-id") {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };

        if let Some(initial) = element
            .get_attribute("data-initial-state")
            .and_then(|attr| ToggleState::from_attr(kind, &attr))
        {
            handle.seed(kind, &id, initial);
        }
        if kind == ToggleKind::RestaurantFavorite {
            if let Some(info) = element
                .get_attribute("data-restaurant")
                .and_then(|attr| serde_json::from_str(&attr).ok())
            {
                handle.seed_restaurant(info);
            }
        }

        // the reaction display button only opens the picker; the option
        // entries carry the actual intents
        if kind == ToggleKind::Reaction {
            continue;
        }

        let handle = handle.clone();
        let click = Closure::<dyn FnMut()>::new(move || {
            on_toggle_click(&handle, kind, &id);
        });

        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            element.set_onclick(Some(click.as_ref().unchecked_ref()));
        }
        click.forget();
    }
}

/// Reaction picker entries: `data-reaction-option` holds a reaction name, or
/// `none` for the explicit removal entry.
pub fn wire_reaction_options(document: &Document, handle: &ToggleHandle) {
    let options = document.query_selector_all(REACTION_OPTION_SELECTOR).unwrap();

    for index in 0..options.length() {
        let element: Element = match options.item(index).and_then(|node| node.dyn_into().ok()) {
            Some(element) => element,
            None => continue,
        };
        let id = match element.get_attribute("data-toggle-id") {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        let desired = match element.get_attribute("data-reaction-option").as_deref() {
            Some("none") => ToggleState::NoReaction,
            Some(attr) => match ReactionKind::from_attr(attr) {
                Some(kind) => ToggleState::Reacted(kind),
                None => continue,
            },
            None => continue,
        };

        let handle = handle.clone();
        let click = Closure::<dyn FnMut()>::new(move || {
            handle.request_toggle(ToggleKind::Reaction, &id, desired);
        });

        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            element.set_onclick(Some(click.as_ref().unchecked_ref()));
        }
        click.forget();
    }
}

fn on_toggle_click(handle: &ToggleHandle, kind: ToggleKind, id: &str) {
    // un-favoriting a restaurant is easy to hit by accident next to the
    // scroll buttons, so it asks first
    if kind == ToggleKind::RestaurantFavorite
        && handle.confirmed(kind, id) == Some(ToggleState::On)
        && !confirm(UNFAVORITE_CONFIRM)
    {
        return;
    }
    handle.click(kind, id);
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
