//! 测量列表与详情

use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::components::sortable_table::SortableTable;
use crate::hooks::{use_fetch, use_fetch_once};
use crate::web::router::Link;
use dosportal::route::AppRoute;
use dosportal::shared::date::{MISSING, format_datetime, format_short};
use dosportal::shared::protocol::{GetMeasurementRequest, ListMeasurementsRequest};
use dosportal::shared::{Airport, Flight, Measurement, OrganizationSummary, Ref};
use dosportal::table::{Column, SortState};
use leptos::prelude::*;
use uuid::Uuid;

pub const MEASUREMENT_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("measurement_type", "Type"),
    Column::sortable("time_start", "Start"),
    Column::sortable("time_end", "End"),
    Column::sortable("owner", "Owner"),
];

fn owner_name(owner: Option<&Ref<OrganizationSummary>>) -> String {
    match owner {
        Some(Ref::Expanded(org)) => org.name.clone(),
        Some(Ref::Id(id)) => id.to_string(),
        None => MISSING.to_string(),
    }
}

pub fn measurement_row(m: Measurement) -> AnyView {
    let title = if m.name.trim().is_empty() {
        "Untitled measurement".to_string()
    } else {
        m.name.clone()
    };
    view! {
        <tr>
            <td>
                <Link to=AppRoute::MeasurementDetail { id: m.id } class="link link-primary">
                    {title}
                </Link>
            </td>
            <td>{m.measurement_type.label()}</td>
            <td class="whitespace-nowrap">{format_short(m.time_start.as_ref())}</td>
            <td class="whitespace-nowrap">{format_short(m.time_end.as_ref())}</td>
            <td>{owner_name(m.owner.as_ref())}</td>
        </tr>
    }
    .into_any()
}

#[component]
pub fn MeasurementsPage() -> impl IntoView {
    let measurements =
        use_fetch_once(|api| async move { api.call(&ListMeasurementsRequest::default()).await });

    view! {
        <PageHeader title="Measurements" />
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                {move || fetch_view(measurements.get(), |list| {
                    view! {
                        <SortableTable
                            columns=MEASUREMENT_COLUMNS
                            rows=list
                            initial=SortState::new("time_start")
                            row=measurement_row
                            empty="No measurements found."
                        />
                    }
                    .into_any()
                })}
            </div>
        </div>
    }
}

#[component]
pub fn MeasurementDetailPage(id: Uuid) -> impl IntoView {
    let measurement = use_fetch(
        move || id,
        |api, id| async move { api.call(&GetMeasurementRequest::new(id)).await },
    );

    move || fetch_view(measurement.get(), |m| view! { <MeasurementDetail measurement=m /> }.into_any())
}

#[component]
fn MeasurementDetail(measurement: Measurement) -> impl IntoView {
    let m = measurement;
    let location = match (m.base_location_lat, m.base_location_lon) {
        (Some(lat), Some(lon)) => {
            let alt = m
                .base_location_alt
                .map(|a| format!(", {:.0} m", a))
                .unwrap_or_default();
            format!("{:.5}, {:.5}{}", lat, lon, alt)
        }
        _ => MISSING.to_string(),
    };

    view! {
        <PageHeader title=m.name.clone() subtitle=m.measurement_type.label() />
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Details"</h2>
                    <dl class="grid grid-cols-3 gap-2 text-sm">
                        <dt class="font-semibold">"Description"</dt>
                        <dd class="col-span-2 whitespace-pre-wrap">{or_missing(m.description.clone())}</dd>
                        <dt class="font-semibold">"Start"</dt>
                        <dd class="col-span-2">{format_datetime(m.time_start.as_ref())}</dd>
                        <dt class="font-semibold">"End"</dt>
                        <dd class="col-span-2">{format_datetime(m.time_end.as_ref())}</dd>
                        <dt class="font-semibold">"Created"</dt>
                        <dd class="col-span-2">{format_datetime(m.time_created.as_ref())}</dd>
                        <dt class="font-semibold">"Owner"</dt>
                        <dd class="col-span-2">{owner_name(m.owner.as_ref())}</dd>
                        <dt class="font-semibold">"Public"</dt>
                        <dd class="col-span-2">{if m.public { "Yes" } else { "No" }}</dd>
                        <dt class="font-semibold">"Base location"</dt>
                        <dd class="col-span-2">{location}</dd>
                    </dl>
                </div>
            </div>
            {m.flight.map(|flight| view! { <FlightCard flight=flight /> })}
        </div>
    }
}

#[component]
fn FlightCard(flight: Ref<Flight>) -> impl IntoView {
    let body = match flight {
        Ref::Expanded(f) => view! {
            <dl class="grid grid-cols-3 gap-2 text-sm">
                <dt class="font-semibold">"Flight number"</dt>
                <dd class="col-span-2">{f.flight_number.clone()}</dd>
                <dt class="font-semibold">"Departure"</dt>
                <dd class="col-span-2">{format_datetime(f.departure_time.as_ref())}</dd>
                <dt class="font-semibold">"Takeoff"</dt>
                <dd class="col-span-2">{airport_link(f.takeoff)}</dd>
                <dt class="font-semibold">"Landing"</dt>
                <dd class="col-span-2">{airport_link(f.land)}</dd>
            </dl>
        }
        .into_any(),
        Ref::Id(id) => view! { <p class="text-sm">"Flight " {id.to_string()}</p> }.into_any(),
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Flight"</h2>
                {body}
            </div>
        </div>
    }
}

fn airport_link(airport: Option<Ref<Airport>>) -> AnyView {
    let (id, label) = match airport {
        Some(Ref::Expanded(a)) => {
            let code = a.code_iata.clone().or(a.code_icao.clone());
            let label = match code {
                Some(code) => format!("{} ({})", a.name, code),
                None => a.name.clone(),
            };
            (a.id, label)
        }
        Some(Ref::Id(id)) => (id, id.to_string()),
        None => return MISSING.to_string().into_any(),
    };
    view! {
        <Link to=AppRoute::AirportDetail { id } class="link link-primary">{label}</Link>
    }
    .into_any()
}
