//! 可编辑字段
//!
//! 显示模式下展示当前值和 Edit 按钮；编辑模式下展示输入框与 Cancel/Save。
//! Save 调用异步回调，成功后才退出编辑模式，失败时把错误显示在字段下方。

use dosportal::error::PortalResult;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

const NOT_PROVIDED: &str = "(not provided)";

/// 输入控件类型
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Textarea,
    /// (取值, 显示名称)
    Select(Vec<(String, String)>),
}

impl FieldKind {
    fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            _ => "text",
        }
    }

    fn display(&self, value: &str) -> String {
        if value.trim().is_empty() {
            return NOT_PROVIDED.to_string();
        }
        match self {
            FieldKind::Select(options) => options
                .iter()
                .find(|(v, _)| v == value)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }
}

#[component]
pub fn EditableField<F, Fut>(
    #[prop(into)] label: String,
    #[prop(into)] value: String,
    #[prop(default = FieldKind::Text)] kind: FieldKind,
    #[prop(optional)] read_only: bool,
    on_save: F,
) -> impl IntoView
where
    F: Fn(String) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = PortalResult<()>> + 'static,
{
    let current = RwSignal::new(value);
    let draft = RwSignal::new(String::new());
    let editing = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let kind = StoredValue::new(kind);

    let start_edit = move |_| {
        draft.set(current.get_untracked());
        error.set(None);
        editing.set(true);
    };

    let cancel = move |_| {
        editing.set(false);
        error.set(None);
    };

    let save = move |_| {
        let value = draft.get_untracked();
        let on_save = on_save.clone();
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match on_save(value.clone()).await {
                Ok(()) => {
                    current.set(value);
                    editing.set(false);
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            saving.set(false);
        });
    };

    let input = move || {
        let kind = kind.get_value();
        match kind {
            FieldKind::Textarea => view! {
                <textarea
                    class="textarea textarea-bordered w-full"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                ></textarea>
            }
            .into_any(),
            FieldKind::Select(options) => view! {
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| draft.set(event_target_value(&ev))
                >
                    {options
                        .into_iter()
                        .map(|(v, text)| {
                            let selected = v.clone();
                            view! {
                                <option value=v selected=move || draft.get() == selected>
                                    {text}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            }
            .into_any(),
            other => view! {
                <input
                    type=other.input_type()
                    class="input input-bordered w-full"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                />
            }
            .into_any(),
        }
    };

    view! {
        <div class="form-control py-2">
            <div class="label">
                <span class="label-text font-semibold">{label}</span>
            </div>
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <div class="flex items-center justify-between gap-2">
                            <span class="whitespace-pre-wrap">
                                {move || kind.with_value(|k| k.display(&current.get()))}
                            </span>
                            <Show when=move || !read_only>
                                <button class="btn btn-ghost btn-xs" on:click=start_edit>
                                    "Edit"
                                </button>
                            </Show>
                        </div>
                    }
                }
            >
                {input}
                <div class="flex gap-2 mt-2">
                    <button class="btn btn-ghost btn-sm" on:click=cancel disabled=move || saving.get()>
                        "Cancel"
                    </button>
                    <button class="btn btn-primary btn-sm" on:click=save.clone() disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </Show>
            {move || error.get().map(|e| view! { <span class="text-error text-sm mt-1">{e}</span> })}
        </div>
    }
}
