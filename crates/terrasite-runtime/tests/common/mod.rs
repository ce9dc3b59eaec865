#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use terrasite_backend::{Host, HostClock, KeyValueStore, StoreResult, UiPresenter};
use terrasite_core::event::NodeId;
use terrasite_core::layout::{NavLinkRecord, SectionRecord};
use terrasite_runtime::page::PageLayout;
use terrasite_widgets::ui_state::UiPatch;

#[derive(Clone, Default)]
pub struct StepClock(Rc<Cell<Duration>>);

impl StepClock {
    pub fn set_ms(&self, ms: u64) {
        self.0.set(Duration::from_millis(ms));
    }
}

impl HostClock for StepClock {
    fn now_mono(&self) -> Duration {
        self.0.get()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_868_000_000 + self.0.get().as_millis() as i64)
            .unwrap()
    }
}

#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<HashMap<String, String>>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.0.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.0.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct Patches(pub Vec<UiPatch>);

impl UiPresenter for Patches {
    type Error = std::convert::Infallible;

    fn present(&mut self, patch: &UiPatch) -> Result<(), Self::Error> {
        self.0.push(patch.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub clock: StepClock,
    pub store: SharedStore,
    pub patches: Patches,
}

impl Host for FakeHost {
    type Error = std::convert::Infallible;
    type Clock = StepClock;
    type Store = SharedStore;
    type Presenter = Patches;

    fn clock(&self) -> &StepClock {
        &self.clock
    }

    fn store(&mut self) -> &mut SharedStore {
        &mut self.store
    }

    fn presenter(&mut self) -> &mut Patches {
        &mut self.patches
    }
}

pub const TOGGLE: NodeId = NodeId(1);
pub const MENU: NodeId = NodeId(2);
pub const HOME: NodeId = NodeId(10);
pub const SERVICES: NodeId = NodeId(11);
pub const CONTACT: NodeId = NodeId(12);
pub const FORM: NodeId = NodeId(30);
pub const TOGGLE_ICON: NodeId = NodeId(5);

/// Home page: hero, services, contact.
pub fn home_layout() -> PageLayout {
    PageLayout {
        header: true,
        menu_toggle: Some(TOGGLE),
        nav_menu: Some(MENU),
        back_to_top: Some(NodeId(3)),
        hero_background: Some(NodeId(4)),
        nav_links: vec![
            NavLinkRecord::new(HOME, "index.html"),
            NavLinkRecord::new(SERVICES, "#services"),
            NavLinkRecord::new(CONTACT, "#contact"),
        ],
        sections: vec![
            SectionRecord::new("hero", 0.0, 900.0),
            SectionRecord::new("services", 900.0, 600.0),
            SectionRecord::new("contact", 1500.0, 400.0),
        ],
        anchor_targets: vec![SectionRecord::new("newsletter", 1700.0, 0.0)],
        animated: vec![NodeId(20), NodeId(21)],
        newsletter_forms: vec![FORM],
    }
}
