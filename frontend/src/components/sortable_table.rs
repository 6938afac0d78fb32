//! 可排序表格组件
//!
//! 排序规则在核心库的 `table` 模块中，这里只负责渲染表头与行。

use dosportal::table::{Column, SortState, Sortable, sorted};
use leptos::prelude::*;

#[component]
pub fn SortableTable<T, R>(
    columns: &'static [Column],
    rows: Vec<T>,
    /// 初始排序列与方向
    initial: SortState,
    /// 渲染一整行 `<tr>`
    row: R,
    #[prop(optional, into)] empty: Option<String>,
) -> impl IntoView
where
    T: Sortable + Clone + Send + Sync + 'static,
    R: Fn(T) -> AnyView + Send + Sync + 'static,
{
    let sort = RwSignal::new(initial);
    let empty = empty.unwrap_or_else(|| "No records found.".to_string());
    let colspan = columns.len().to_string();

    let header = columns
        .iter()
        .copied()
        .map(|col| {
            if col.sortable {
                view! {
                    <th
                        class="cursor-pointer select-none"
                        on:click=move |_| sort.update(|s| s.click(col.key))
                    >
                        {col.label}
                        " "
                        <span class="text-xs">{move || sort.with(|s| s.indicator(col.key))}</span>
                    </th>
                }
                .into_any()
            } else {
                view! { <th>{col.label}</th> }.into_any()
            }
        })
        .collect_view();

    let body = move || {
        let ordered = sort.with(|s| sorted(&rows, s));
        if ordered.is_empty() {
            view! {
                <tr>
                    <td colspan=colspan.clone() class="text-center py-8 text-base-content/50">
                        {empty.clone()}
                    </td>
                </tr>
            }
            .into_any()
        } else {
            ordered.into_iter().map(&row).collect_view().into_any()
        }
    };

    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}
