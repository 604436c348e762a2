use cookbook_frontend::{ApiClient, RecipeBrowserPage};
use leptos::*;
use log::{error, info};

fn main() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    info!("Starting");
    mount_to_body(|| {
        view! {
            <App />
        }
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Landing,
    Browser,
}

fn origin() -> Option<String> {
    window()
        .location()
        .origin()
        .map_err(|err| error!("Window has no origin, cannot reach the recipe api: {err:?}"))
        .ok()
}

#[component]
fn Landing(set_screen: WriteSignal<Screen>) -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col items-center justify-center bg-gradient-to-br from-purple-100 via-pink-50 to-purple-50">
            <h1 class="text-6xl font-bold text-purple-700 mb-4">"Gourmet Menu"</h1>
            <p class="text-xl text-slate-700 font-medium mb-10">
                "Breakfast, lunch, dinner and dessert, all in one place"
            </p>
            <button
                class="px-10 py-5 bg-purple-600 text-white text-xl font-bold rounded-2xl shadow-xl hover:bg-purple-700"
                on:click=move |_| set_screen.set(Screen::Browser)
            >
                "Check it out"
            </button>
        </div>
    }
}

#[component]
fn App() -> impl IntoView {
    let (screen, set_screen) = create_signal(Screen::Landing);
    let client = origin().map(ApiClient::new);
    move || match (screen.get(), client.clone()) {
        (Screen::Landing, _) => view! { <Landing set_screen/> }.into_view(),
        (Screen::Browser, Some(client)) => view! { <RecipeBrowserPage client/> }.into_view(),
        (Screen::Browser, None) => view! {
            <div class="min-h-screen flex items-center justify-center">
                <p class="text-xl text-red-700 font-semibold">"Cannot reach the recipe server"</p>
            </div>
        }
        .into_view(),
    }
}
