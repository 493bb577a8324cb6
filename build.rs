#[path = "build/config.rs"]
mod build_config;

use build_config::config::Cfgs;

fn main() {
    let mut cfgs = Cfgs::new();

    if cfgs.is_checked() && cfgs.is_publish() {
        panic!("a build may be either checked or published, but not both");
    }

    // debug/test builds get the same extra bounds-checking as `checked` builds
    if cfgs.is_debug() {
        cfgs.enable(Cfgs::FALCONJSON_CHECKED);
    }

    cfgs.apply();
}
