use dosportal_frontend::App;
use leptos::prelude::*;

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

/// 日志级别在编译期通过 `DOSPORTAL_LOG` 指定，默认 info
fn log_level() -> log::Level {
    option_env!("DOSPORTAL_LOG")
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::Level::Info)
}

pub fn main() {
    console_error_panic_hook::set_once();
    // 重复初始化只会返回错误，忽略即可
    let _ = console_log::init_with_level(log_level());
    log::info!("DOSPORTAL frontend starting");
    mount_to_body(App);
}
