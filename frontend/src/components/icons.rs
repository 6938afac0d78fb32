//! 内联 SVG 图标（lucide 线条风格），通过 `attr:class` 控制尺寸与颜色

use leptos::prelude::*;

macro_rules! icon {
    ($(#[$meta:meta])* $name:ident, $($path:tt),+ $(,)?) => {
        $(#[$meta])*
        #[component]
        pub fn $name() -> impl IntoView {
            view! {
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    $( <path d=$path /> )+
                </svg>
            }
        }
    };
}

icon!(ShieldCheck, "M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z", "m9 12 2 2 4-4");
icon!(Plus, "M5 12h14", "M12 5v14");
icon!(LogOut, "M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4", "m16 17 5-5-5-5", "M21 12H9");
icon!(RefreshCw, "M21 12a9 9 0 0 0-15-6.7L3 8", "M3 3v5h5", "M3 12a9 9 0 0 0 15 6.7l3-2.7", "M16 16h5v5");
icon!(Pencil, "M17 3a2.85 2.85 0 1 1 4 4L7.5 20.5 2 22l1.5-5.5Z");
icon!(Upload, "M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4", "m17 8-5-5-5 5", "M12 3v12");
icon!(Radiation, "M12 12h.01", "M7.5 4.2c-.3-.5-.9-.7-1.3-.4C3.9 5.5 2.3 8.1 2 11c0 .5.4 1 1 1h5c0-1.5.8-2.8 2-3.4-1.1-1.9-2.2-3.6-2.5-4.4z", "M21 12c.6 0 1-.4 1-1-.3-2.9-1.8-5.5-4.1-7.1-.4-.3-1.1-.2-1.3.3-.3.8-1.4 2.5-2.5 4.4 1.2.6 2 1.9 2 3.4z", "M7.5 19.8c-.3.5-.1 1.1.4 1.3 2.6 1.2 5.6 1.2 8.2 0 .5-.2.7-.8.4-1.3-.5-.9-1.4-2.5-2.5-4.3-1.2.7-2.8.7-4 0-1.1 1.8-2 3.4-2.5 4.3z");
icon!(AlertCircle, "M12 8v4", "M12 16h.01", "M22 12a10 10 0 1 1-20 0 10 10 0 0 1 20 0z");
icon!(Users, "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2", "M9 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8z", "M22 21v-2a4 4 0 0 0-3-3.87", "M16 3.13a4 4 0 0 1 0 7.75");
icon!(Download, "M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4", "m7 10 5 5 5-5", "M12 15V3");
