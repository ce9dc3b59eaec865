#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use terrasite_core::event::{ClickEvent, Element, ElementRole, Event, IntersectionEntry, NodeId, ScrollSnapshot};
use terrasite_core::layout::{NavLinkRecord, SectionRecord};
use terrasite_runtime::{PageController, PageLayout};
use terrasite_web::WebHost;

#[derive(Debug, Arbitrary)]
enum Step {
    Scroll(i16),
    Relayout(u8),
    ClickToggle,
    ClickLink(bool),
    ClickOutside,
    ClickBackToTop,
    Reveal(u8, bool),
    Submit(bool),
    Wait(u16),
}

const ROLES: [ElementRole; 2] = [ElementRole::NavLink, ElementRole::Anchor];

fn layout() -> PageLayout {
    PageLayout {
        header: true,
        menu_toggle: Some(NodeId(1)),
        nav_menu: Some(NodeId(2)),
        back_to_top: Some(NodeId(3)),
        hero_background: Some(NodeId(4)),
        nav_links: vec![
            NavLinkRecord::new(NodeId(10), "index.html"),
            NavLinkRecord::new(NodeId(11), "#b"),
        ],
        sections: sections(500.0),
        anchor_targets: Vec::new(),
        animated: vec![NodeId(20), NodeId(21)],
        newsletter_forms: vec![NodeId(30)],
    }
}

fn sections(split: f64) -> Vec<SectionRecord> {
    vec![
        SectionRecord::new("a", 0.0, split),
        SectionRecord::new("b", split, 500.0),
    ]
}

fn to_event(step: &Step) -> Option<Event> {
    Some(match *step {
        Step::Scroll(y) => Event::Scroll(ScrollSnapshot::new(f64::from(y) * 4.0, 800.0)),
        Step::Relayout(split) => Event::Relayout {
            sections: sections(f64::from(split) * 8.0),
            anchor_targets: Vec::new(),
        },
        Step::ClickToggle => Event::Click(ClickEvent::new(vec![
            Element::new(NodeId(5), ElementRole::Other),
            Element::new(NodeId(1), ElementRole::MenuToggle),
        ])),
        Step::ClickLink(anchor) => Event::Click(ClickEvent::new(vec![
            Element::new(NodeId(11), ROLES[usize::from(anchor)]).href("#b"),
            Element::new(NodeId(2), ElementRole::NavMenu),
        ])),
        Step::ClickOutside => Event::Click(ClickEvent::new(vec![Element::new(
            NodeId(99),
            ElementRole::Other,
        )])),
        Step::ClickBackToTop => Event::Click(ClickEvent::new(vec![Element::new(
            NodeId(3),
            ElementRole::BackToTop,
        )])),
        Step::Reveal(which, on) => Event::Intersection(vec![IntersectionEntry::new(
            NodeId(20 + u32::from(which % 2)),
            on,
        )]),
        Step::Submit(valid) => Event::Submit {
            form: NodeId(30),
            email: if valid { "a@b.com" } else { "nope" }.to_owned(),
        },
        Step::Wait(_) => return None,
    })
}

fuzz_target!(|steps: Vec<Step>| {
    if steps.len() > 256 {
        return;
    }
    let mut page = PageController::with_defaults(WebHost::new());
    page.attach(layout());
    page.handle(Event::Load(None)).expect("open presenter");

    let mut revealed = 0usize;
    for step in &steps {
        if let Step::Wait(ms) = *step {
            page.host_mut()
                .clock_mut()
                .advance(Duration::from_millis(u64::from(ms)));
        }
        match to_event(step) {
            Some(event) => page.handle(event).expect("open presenter"),
            None => page.tick().expect("open presenter"),
        };

        let ui = page.ui_state();
        // Reveal is one-way.
        assert!(ui.revealed.len() >= revealed);
        revealed = ui.revealed.len();
        // At most one nav link is highlighted.
        assert!(ui.active_links.len() <= 1);
    }
});
