use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use route_planner::{
    plan_path_with_outcome, Building, MapTransform, NavigationState, PlanOutcome, Point,
    ReferenceMarker, Room,
};
use wasm_bindgen::prelude::*;

mod canvas;
use canvas::*;

const API_BASE: &str = "http://localhost:3000";
const DEFAULT_BUILDING: &str = "ams-nest";

// Pointer travel (client pixels) before a press counts as a drag instead of a click
const DRAG_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, Copy)]
struct DragStart {
    client: Point,
    origin: Point,
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/leptos-frontend.css"/>
        <Title text="Room Finder"/>
        <NavigationView building_id=DEFAULT_BUILDING.to_string()/>
    }
}

#[component]
fn NavigationView(building_id: String) -> impl IntoView {
    let building = RwSignal::new(Option::<Building>::None);
    let error = RwSignal::new(Option::<String>::None);
    let current_floor = RwSignal::new(String::new());
    let search_query = RwSignal::new(String::new());
    let selected_room = RwSignal::new(Option::<Room>::None);
    let pin = RwSignal::new(Option::<Point>::None);
    let transform = RwSignal::new(MapTransform::default());
    let drag = RwSignal::new(Option::<DragStart>::None);
    let dragged = RwSignal::new(false);
    let reference = ReferenceMarker::default();

    let viewport_ref = NodeRef::<leptos::html::Div>::new();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    spawn_local(async move {
        match fetch_building(&building_id).await {
            Ok(loaded) => {
                if let Some(first) = loaded.floors.first() {
                    current_floor.set(first.name.clone());
                }
                building.set(Some(loaded));
                error.set(None);
            }
            Err(e) => error.set(Some(format!("Failed to load building: {}", e))),
        }
    });

    let floor_names = Memo::new(move |_| {
        building.with(|b| {
            b.as_ref()
                .map(|b| b.summary().floor_names)
                .unwrap_or_default()
        })
    });

    let floor_rooms = Memo::new(move |_| {
        let floor_name = current_floor.get();
        building.with(|b| {
            b.as_ref()
                .and_then(|b| b.floor(&floor_name))
                .map(|floor| floor.rooms.clone())
                .unwrap_or_default()
        })
    });

    let search_results = Memo::new(move |_| {
        let query = search_query.get();
        let floor_name = current_floor.get();
        building.with(|b| {
            b.as_ref()
                .and_then(|b| b.floor(&floor_name))
                .map(|floor| floor.search(&query).into_iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        })
    });

    // Rebuilt whenever the pin or the selected room changes
    let navigation = Memo::new(move |_| NavigationState {
        reference,
        pin: pin.get(),
        selected_room: selected_room.get().map(|room| room.center()),
    });

    let room_curve_d = Memo::new(move |_| {
        navigation
            .get()
            .selected_room_curve()
            .map(|curve| curve.to_svg_path())
    });

    let route = Memo::new(move |_| {
        navigation.get().planner_request().map(|request| {
            let (path, outcome) = plan_path_with_outcome(&request);
            (path.to_svg_path(), outcome)
        })
    });

    // Repaint the floor whenever its rooms or the selection change
    Effect::new(move |_| {
        let rooms = floor_rooms.get();
        let selected_id = selected_room.with(|room| room.as_ref().map(|r| r.id.clone()));

        if let Some(canvas) = canvas_ref.get() {
            render_floor(&canvas, &rooms, selected_id.as_deref());
        }
    });

    // Pointer position relative to the map viewport
    let client_point = move |ev: &web_sys::MouseEvent| -> Option<Point> {
        let viewport = viewport_ref.get_untracked()?;
        let rect = viewport.get_bounding_client_rect();
        Some(Point::new(
            ev.client_x() as f64 - rect.left(),
            ev.client_y() as f64 - rect.top(),
        ))
    };

    let on_mouse_down = move |ev: web_sys::MouseEvent| {
        if let Some(client) = client_point(&ev) {
            let origin = transform.get_untracked().drag_origin(client);
            drag.set(Some(DragStart { client, origin }));
            dragged.set(false);
        }
    };

    let on_mouse_move = move |ev: web_sys::MouseEvent| {
        let Some(start) = drag.get_untracked() else {
            return;
        };
        let Some(client) = client_point(&ev) else {
            return;
        };

        if dragged.get_untracked() || client.distance_to(&start.client) > DRAG_THRESHOLD {
            dragged.set(true);
            transform.update(|t| t.pan_to(client, start.origin));
        }
    };

    let end_drag = move |_: web_sys::MouseEvent| drag.set(None);

    let on_click = move |ev: web_sys::MouseEvent| {
        if dragged.get_untracked() {
            return;
        }
        let Some(client) = client_point(&ev) else {
            return;
        };

        let floor_point = transform.get_untracked().to_floor(client);
        if !floor_point.is_finite() {
            return;
        }

        let hit = building.with_untracked(|b| {
            b.as_ref()
                .and_then(|b| b.floor(&current_floor.get_untracked()))
                .and_then(|floor| floor.room_at(&floor_point))
                .cloned()
        });

        match hit {
            Some(room) => selected_room.set(Some(room)),
            None => pin.set(Some(floor_point)),
        }
    };

    let on_wheel = move |ev: web_sys::WheelEvent| {
        ev.prevent_default();
        transform.update(|t| t.zoom(ev.delta_y()));
    };

    let layer_style = move || {
        let t = transform.get();
        format!(
            "position: absolute; inset: 0; transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
            t.x, t.y, t.scale
        )
    };

    let marker_x = reference.position.x.to_string();
    let marker_y = reference.position.y.to_string();

    view! {
        <div class="container">
            <header>
                <h1>
                    {move || building.with(|b| {
                        b.as_ref().map(|b| b.name.clone()).unwrap_or_else(|| "Loading...".to_string())
                    })}
                </h1>
                <input
                    type="text"
                    class="room-search"
                    placeholder="Search for room names"
                    prop:value=move || search_query.get()
                    on:input=move |ev| search_query.set(event_target_value(&ev))
                />
            </header>

            {move || error.get().map(|err| view! {
                <div class="error">
                    {err}
                </div>
            })}

            <div
                class="map-viewport"
                node_ref=viewport_ref
                style="position: relative; overflow: hidden; height: calc(100vh - 240px); cursor: grab;"
                on:mousedown=on_mouse_down
                on:mousemove=on_mouse_move
                on:mouseup=end_drag
                on:mouseleave=end_drag
                on:click=on_click
                on:wheel=on_wheel
            >
                <div class="map-layer" style=layer_style>
                    <canvas
                        node_ref=canvas_ref
                        width="800"
                        height="600"
                        style="position: absolute; left: 0; top: 0;"
                    />
                    <svg
                        width="800"
                        height="600"
                        style="position: absolute; left: 0; top: 0; pointer-events: none;"
                    >
                        {move || room_curve_d.get().map(|d| view! {
                            <path d=d stroke="#3b82f6" stroke-width="4" fill="none" stroke-linecap="round"/>
                        })}
                        {move || route.get().map(|(d, _)| view! {
                            <path
                                d=d
                                stroke="#f97316"
                                stroke-width="3"
                                stroke-dasharray="8 6"
                                fill="none"
                                stroke-linecap="round"
                            />
                        })}
                        <circle cx=marker_x cy=marker_y r="8" fill="#3b82f6" stroke="white" stroke-width="2"/>
                        {move || pin.get().map(|p| view! {
                            <circle cx=p.x.to_string() cy=p.y.to_string() r="6" fill="#ef4444"/>
                        })}
                    </svg>
                </div>
            </div>

            <div class="bottom-sheet">
                {move || match selected_room.get() {
                    Some(room) => view! {
                        <div class="selected-room">
                            <h3>{format!("ROOM {}", room.name)}</h3>
                            <button on:click=move |_| selected_room.set(None)>"Clear"</button>
                        </div>
                    }.into_any(),
                    None => view! {
                        <div class="selected-room">
                            <h3>"Select a Room"</h3>
                            <p>"Click on a room to select it, or anywhere else to drop a pin"</p>
                        </div>
                    }.into_any(),
                }}

                <p class="route-status">
                    {move || route.get().map(|(_, outcome)| outcome_label(outcome))}
                </p>

                <div class="floor-select">
                    <label for="floor">"Current Floor"</label>
                    <select
                        id="floor"
                        on:change=move |ev| {
                            current_floor.set(event_target_value(&ev));
                            // Each floor is its own plane
                            selected_room.set(None);
                            pin.set(None);
                        }
                    >
                        <For
                            each=move || floor_names.get()
                            key=|name| name.clone()
                            children=move |name: String| {
                                let label = format!("Floor {}", name);
                                let value = name.clone();
                                view! {
                                    <option value=value prop:selected=move || current_floor.get() == name>
                                        {label}
                                    </option>
                                }
                            }
                        />
                    </select>
                </div>
            </div>

            <ul class="room-results">
                <For
                    each=move || search_results.get()
                    key=|room| room.id.clone()
                    children=move |room: Room| {
                        let label = room.name.clone();
                        let kind = format!("{:?}", room.kind);
                        view! {
                            <li class="room-result" on:click=move |_| selected_room.set(Some(room.clone()))>
                                {label}
                                <span class="room-kind">{kind}</span>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}

fn outcome_label(outcome: PlanOutcome) -> &'static str {
    match outcome {
        PlanOutcome::Straight => "Direct route",
        PlanOutcome::Detour { .. } => "Detour around the room path",
        PlanOutcome::Fallback => "Best-effort route (may cross the room path)",
    }
}

async fn fetch_building(id: &str) -> Result<Building, String> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/buildings/{}", API_BASE, id))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("Server error ({}): {}", status, error_text));
    }

    response
        .json::<Building>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
