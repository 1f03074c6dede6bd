use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Storage, Window,
};

use crate::config::PageConfig;
use crate::error::Result;
use crate::page::{
    navbar_scrolled, RevealOptions, RevealTracker, NAVBAR_SCROLLED_CLASS, REVEAL_SELECTOR,
    REVEAL_VISIBLE_CLASS,
};
use crate::theme::{ThemeStore, ThemeSwitch};

use super::js_err;

const THEME_ATTRIBUTE: &str = "data-theme";
const THEME_TOGGLE: &str = "theme-toggle";

/// `localStorage`, if the browser allows it.
pub struct LocalStorage(Option<Storage>);

impl LocalStorage {
    pub fn new(window: &Window) -> Self {
        Self(window.local_storage().ok().flatten())
    }
}

impl ThemeStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.0 {
            if storage.set_item(key, value).is_err() {
                log::warn!("could not persist theme preference");
            }
        }
    }
}

/// Wire up the theme toggle, navbar styling and reveal animations.
pub fn install(window: &Window, document: &Document, config: &PageConfig) -> Result<()> {
    install_theme(window, document)?;
    install_navbar(window, document, config.navbar_threshold)?;
    install_reveal(document, &RevealOptions::from(config))
}

fn apply_theme(document: &Document, theme: &str) {
    if let Some(root) = document.document_element() {
        let _ = root.set_attribute(THEME_ATTRIBUTE, theme);
    }
}

fn install_theme(window: &Window, document: &Document) -> Result<()> {
    let switch = ThemeSwitch::load(LocalStorage::new(window));
    apply_theme(document, switch.attribute());
    log::debug!("theme restored as {}", switch.attribute());

    let Some(toggle) = document.get_element_by_id(THEME_TOGGLE) else {
        return Ok(());
    };

    let switch = Rc::new(RefCell::new(switch));
    let doc = document.clone();
    let on_click = Closure::wrap(Box::new(move || {
        let theme = switch.borrow_mut().toggle();
        apply_theme(&doc, theme.as_str());
    }) as Box<dyn FnMut()>);
    toggle
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_click.forget();
    Ok(())
}

fn install_navbar(window: &Window, document: &Document, threshold: f64) -> Result<()> {
    let Some(navbar) = document.query_selector(".navbar").map_err(js_err)? else {
        return Ok(());
    };

    let win = window.clone();
    let on_scroll = Closure::wrap(Box::new(move || {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        let classes = navbar.class_list();
        let _ = if navbar_scrolled(scroll_y, threshold) {
            classes.add_1(NAVBAR_SCROLLED_CLASS)
        } else {
            classes.remove_1(NAVBAR_SCROLLED_CLASS)
        };
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_scroll.forget();
    Ok(())
}

fn install_reveal(document: &Document, options: &RevealOptions) -> Result<()> {
    let nodes = document.query_selector_all(REVEAL_SELECTOR).map_err(js_err)?;
    let targets: Vec<Element> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect();
    if targets.is_empty() {
        return Ok(());
    }

    let tracker = Rc::new(RefCell::new(RevealTracker::new(targets.len())));
    let observed = targets.clone();
    let on_intersect = Closure::wrap(Box::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(index) = observed.iter().position(|el| el.is_same_node(Some(&*target)))
                else {
                    continue;
                };
                if tracker.borrow_mut().observe(index, entry.is_intersecting()) {
                    let _ = target.class_list().add_1(REVEAL_VISIBLE_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)
            .map_err(js_err)?;
    on_intersect.forget();

    for element in &targets {
        observer.observe(element);
    }
    log::debug!("observing {} reveal targets", targets.len());
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn setup() -> (Window, Document) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        (window, document)
    }

    #[wasm_bindgen_test]
    fn theme_defaults_to_light_and_toggles_on_click() {
        let (window, document) = setup();
        let storage = window.local_storage().unwrap().unwrap();
        storage.remove_item(crate::theme::STORAGE_KEY).unwrap();

        let button = document.create_element("button").unwrap();
        button.set_id(THEME_TOGGLE);
        document.body().unwrap().append_child(&button).unwrap();

        install_theme(&window, &document).unwrap();
        let root = document.document_element().unwrap();
        assert_eq!(root.get_attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));

        button.dyn_ref::<web_sys::HtmlElement>().unwrap().click();
        assert_eq!(root.get_attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));
        assert_eq!(
            storage.get_item(crate::theme::STORAGE_KEY).unwrap().as_deref(),
            Some("dark")
        );

        button.remove();
        storage.remove_item(crate::theme::STORAGE_KEY).unwrap();
    }

    #[wasm_bindgen_test]
    fn missing_theme_toggle_still_applies_saved_theme() {
        let (window, document) = setup();
        let storage = window.local_storage().unwrap().unwrap();
        storage.set_item(crate::theme::STORAGE_KEY, "dark").unwrap();

        install_theme(&window, &document).unwrap();
        let root = document.document_element().unwrap();
        assert_eq!(root.get_attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));

        storage.remove_item(crate::theme::STORAGE_KEY).unwrap();
    }

    #[wasm_bindgen_test]
    fn reveal_leaves_target_attributes_alone() {
        let (_, document) = setup();
        let target = document.create_element("div").unwrap();
        target.set_class_name("fade-up");
        document.body().unwrap().append_child(&target).unwrap();

        install_reveal(&document, &RevealOptions::from(&PageConfig::default())).unwrap();
        assert_eq!(target.get_attribute_names().length(), 1);

        target.remove();
    }
}
