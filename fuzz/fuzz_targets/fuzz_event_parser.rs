#![no_main]

use libfuzzer_sys::fuzz_target;
use terrasite_runtime::PageController;
use terrasite_web::WebHost;
use terrasite_web::input_parser::{parse_event, parse_layout};

const LAYOUT: &str = r##"{
    "header": true, "menu_toggle": 1, "nav_menu": 2, "back_to_top": 3,
    "hero_background": 4,
    "nav_links": [{"id": 10, "href": "index.html"}, {"id": 11, "href": "#b"}],
    "sections": [{"id": "a", "top": 0, "height": 500}, {"id": "b", "top": 500, "height": 500}],
    "animated": [20], "newsletter_forms": [30]
}"##;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // Neither parser may panic on arbitrary text.
    let _ = parse_layout(text);
    let Ok(Some(event)) = parse_event(text) else {
        return;
    };

    // Whatever parses must be handled without panicking.
    let Ok(layout) = parse_layout(LAYOUT) else {
        return;
    };
    let mut page = PageController::with_defaults(WebHost::new());
    page.attach(layout);
    page.handle(event).expect("open presenter accepts patches");

    // Any toast the event raised retires once its display and exit windows pass.
    page.host_mut()
        .clock_mut()
        .advance(std::time::Duration::from_millis(5300));
    page.tick().expect("open presenter accepts patches");
    assert!(page.ui_state().notification.is_none());
});
