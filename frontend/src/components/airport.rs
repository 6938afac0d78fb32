use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::hooks::use_fetch;
use dosportal::shared::Airport;
use dosportal::shared::protocol::GetAirportRequest;
use dosportal::shared::date::MISSING;
use leptos::prelude::*;
use uuid::Uuid;

#[component]
pub fn AirportDetailPage(id: Uuid) -> impl IntoView {
    let airport = use_fetch(
        move || id,
        |api, id| async move { api.call(&GetAirportRequest::new(id)).await },
    );

    move || fetch_view(airport.get(), |a| view! { <AirportCard airport=a /> }.into_any())
}

#[component]
fn AirportCard(airport: Airport) -> impl IntoView {
    let codes = [airport.code_iata.as_deref(), airport.code_icao.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ");
    let position = match (airport.lat, airport.lon) {
        (Some(lat), Some(lon)) => Some(format!("{:.4}, {:.4}", lat, lon)),
        _ => None,
    };
    let map_link = match (airport.lat, airport.lon) {
        (Some(lat), Some(lon)) => Some(format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=12/{lat}/{lon}"
        )),
        _ => None,
    };

    view! {
        <PageHeader title=airport.name.clone() subtitle=codes />
        <div class="card bg-base-100 shadow max-w-xl">
            <div class="card-body">
                <dl class="grid grid-cols-3 gap-2 text-sm">
                    <dt class="font-semibold">"Municipality"</dt>
                    <dd class="col-span-2">{or_missing(airport.municipality.clone())}</dd>
                    <dt class="font-semibold">"Position"</dt>
                    <dd class="col-span-2">{or_missing(position)}</dd>
                    <dt class="font-semibold">"Altitude"</dt>
                    <dd class="col-span-2">{or_missing(airport.alt.map(|a| format!("{:.0} m", a)))}</dd>
                    <dt class="font-semibold">"Website"</dt>
                    <dd class="col-span-2">
                        {match airport.web.clone() {
                            Some(web) => {
                                let label = web.clone();
                                view! {
                                    <a href=web target="_blank" rel="noopener" class="link link-primary">{label}</a>
                                }
                                .into_any()
                            }
                            None => MISSING.to_string().into_any(),
                        }}
                    </dd>
                </dl>
                {map_link.map(|href| view! {
                    <div class="card-actions justify-end">
                        <a href=href target="_blank" rel="noopener" class="btn btn-sm btn-outline">
                            "Open in OpenStreetMap"
                        </a>
                    </div>
                })}
            </div>
        </div>
    }
}
