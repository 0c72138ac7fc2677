//! Browser glue, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use bug_crossing::engine::{self, Resources};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn missing_image_is_an_error() {
    let result = engine::load_image("does-not-exist.png").await;
    assert!(result.is_err());
}

#[wasm_bindgen_test]
async fn resources_report_the_failing_source() {
    let sources = vec!["nope/one.png".to_string(), "nope/two.png".to_string()];
    let err = match Resources::load(&sources).await {
        Ok(_) => panic!("loading missing images succeeded"),
        Err(err) => err,
    };
    assert!(format!("{:#}", err).contains("nope/"));
}

#[wasm_bindgen_test]
fn empty_cache_has_no_sprites() {
    let resources = Resources::default();
    assert!(resources.get("images/enemy-bug.png").is_none());
}
