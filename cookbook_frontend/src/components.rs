use cookbook_model::{Category, CategoryFilter, RecipeId, RecipeOperations, RecipeWithId};
use leptos::*;
use time::OffsetDateTime;

use crate::api::ApiClient;
use crate::browser::RecipeBrowser;

/// Owns the browser state and the client, and runs the store calls.
#[derive(Clone, Copy)]
pub struct BrowserController {
    pub state: RwSignal<RecipeBrowser>,
    client: StoredValue<ApiClient>,
}

impl BrowserController {
    pub fn new(client: ApiClient) -> Self {
        BrowserController {
            state: create_rw_signal(RecipeBrowser::default()),
            client: store_value(client),
        }
    }

    pub fn load(self) {
        let mut filter = CategoryFilter::All;
        self.state.update(|browser| filter = browser.begin_load());
        let client = self.client.get_value();
        spawn_local(async move {
            let result = client.list_recipes(filter).await;
            self.state.update(|browser| browser.finish_load(result));
        });
    }

    pub fn select_category(self, filter: CategoryFilter) {
        self.state.update(|browser| browser.select_category(filter));
        self.load();
    }

    pub fn select(self, id: RecipeId) {
        self.state.update(|browser| {
            browser.select(id);
        });
    }

    pub fn pick_random(self) {
        self.state.update(|browser| {
            browser.pick_random(&mut rand::thread_rng());
        });
    }

    pub fn add(self) {
        let mut recipe = None;
        self.state
            .update(|browser| recipe = browser.begin_add(OffsetDateTime::now_utc()));
        let Some(recipe) = recipe else {
            return;
        };
        let client = self.client.get_value();
        spawn_local(async move {
            let result = client.add_recipe(recipe).await;
            let mut added = false;
            self.state.update(|browser| added = browser.finish_add(result));
            if added {
                self.load();
            }
        });
    }

    pub fn delete(self, id: RecipeId) {
        self.state.update(|browser| {
            browser.begin_delete(id);
        });
        let client = self.client.get_value();
        spawn_local(async move {
            let result = client.delete_recipe(id).await;
            self.state.update(|browser| browser.finish_delete(id, result));
        });
    }

    fn with<T>(self, f: impl FnOnce(&RecipeBrowser) -> T) -> T {
        self.state.with(f)
    }
}

#[component]
pub fn SkeletonLoader() -> impl IntoView {
    view! {
        <div class="flex-1 p-8">
            <div class="max-w-6xl mx-auto">
                <div class="animate-pulse mb-8 text-center">
                    <div class="h-12 bg-slate-300 rounded-lg w-3/4 mx-auto mb-4"></div>
                    <div class="h-6 bg-slate-300 rounded-lg w-1/2 mx-auto"></div>
                </div>
                <div class="grid lg:grid-cols-2 gap-8">
                    <div class="bg-white p-8 rounded-3xl shadow-xl border border-purple-200 animate-pulse">
                        <div class="h-8 bg-slate-300 rounded-lg w-1/3 mb-6"></div>
                        <div class="space-y-4">
                            <div class="h-6 bg-slate-200 rounded-lg"></div>
                            <div class="h-6 bg-slate-200 rounded-lg w-5/6"></div>
                            <div class="h-6 bg-slate-200 rounded-lg w-4/6"></div>
                        </div>
                    </div>
                    <div class="bg-white p-8 rounded-3xl shadow-xl border border-purple-200 animate-pulse">
                        <div class="h-8 bg-slate-300 rounded-lg w-1/3 mb-6"></div>
                        <div class="space-y-4">
                            <div class="h-16 bg-slate-200 rounded-lg"></div>
                            <div class="h-16 bg-slate-200 rounded-lg"></div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn CategoryDropdown(controller: BrowserController) -> impl IntoView {
    let filter = move || controller.with(RecipeBrowser::filter);
    view! {
        <div class="relative">
            <button
                class="w-full flex items-center justify-between p-4 bg-purple-600 text-white rounded-2xl shadow-lg"
                on:click=move |_| controller.state.update(RecipeBrowser::toggle_dropdown)
            >
                <span class="text-2xl">{move || filter().icon()}</span>
                <span class="font-bold text-lg">{move || filter().label()}</span>
            </button>
            {move || {
                controller.with(RecipeBrowser::show_dropdown).then(|| view! {
                    <div class="absolute top-full left-0 right-0 mt-2 bg-white border border-purple-200 rounded-2xl shadow-2xl z-50">
                        {CategoryFilter::FILTERS
                            .into_iter()
                            .map(|option| view! {
                                <button
                                    class="w-full text-left px-6 py-4 hover:bg-purple-100 flex items-center gap-3"
                                    on:click=move |_| controller.select_category(option)
                                >
                                    <span class="text-xl">{option.icon()}</span>
                                    <span class="font-semibold text-slate-800">{option.label()}</span>
                                </button>
                            })
                            .collect_view()}
                    </div>
                })
            }}
        </div>
    }
}

#[component]
fn RecipeListItem(controller: BrowserController, recipe: RecipeWithId) -> impl IntoView {
    let id = recipe.id;
    let is_selected = move || controller.with(RecipeBrowser::selected_id) == Some(id);
    view! {
        <button
            class=move || {
                if is_selected() {
                    "w-full text-left p-4 rounded-2xl bg-purple-600 text-white shadow-lg"
                } else {
                    "w-full text-left p-4 rounded-2xl bg-white hover:bg-purple-50 border border-purple-200"
                }
            }
            on:click=move |_| controller.select(id)
        >
            <div class="font-bold">{recipe.data.name}</div>
            <div class="text-sm">{recipe.data.category.icon()}" "{recipe.data.category.as_str()}</div>
        </button>
    }
}

#[component]
pub fn RecipeList(controller: BrowserController) -> impl IntoView {
    move || {
        let (loading, empty) =
            controller.with(|browser| (browser.is_loading(), browser.recipes().is_empty()));
        if loading && empty {
            view! {
                <div class="flex justify-center p-8">
                    <div class="w-8 h-8 border-4 border-purple-600 border-t-transparent rounded-full animate-spin"></div>
                </div>
            }
            .into_view()
        } else if empty {
            view! {
                <div class="text-center p-8">
                    <p class="text-slate-700 font-semibold">"No recipes found"</p>
                    <p class="text-slate-600 text-sm mt-1 font-medium">
                        "Try a different category or add a new recipe!"
                    </p>
                </div>
            }
            .into_view()
        } else {
            view! {
                <div class="space-y-3">
                    <For
                        each=move || controller.with(|browser| browser.recipes().to_vec())
                        key=|recipe| recipe.id
                        children=move |recipe| view! { <RecipeListItem controller=controller recipe=recipe/> }
                    />
                </div>
            }
            .into_view()
        }
    }
}

#[component]
pub fn RecipeDetail(controller: BrowserController, recipe: RecipeWithId) -> impl IntoView {
    let RecipeWithId { id, data } = recipe;
    view! {
        <div class="flex-1 p-8 overflow-y-auto">
            <div class="max-w-6xl mx-auto">
                <div class="text-center mb-8">
                    <h1 class="text-5xl font-bold text-slate-800 mb-4">{data.name}</h1>
                    <div class="flex items-center justify-center gap-4">
                        <span class="font-semibold text-lg">"Created by "{data.author}</span>
                        <span class="px-4 py-2 bg-purple-600 text-white rounded-full">
                            {data.category.label()}
                        </span>
                        <button
                            class="px-4 py-2 bg-red-500 text-white rounded-full disabled:opacity-50"
                            disabled=move || controller.with(RecipeBrowser::is_loading)
                            on:click=move |_| controller.delete(id)
                        >
                            "Delete"
                        </button>
                    </div>
                </div>
                <div class="grid lg:grid-cols-2 gap-8">
                    <div class="bg-white p-8 rounded-3xl shadow-xl border border-purple-200">
                        <h3 class="text-3xl font-bold text-slate-800 mb-6">"Ingredients"</h3>
                        <ul class="space-y-3">
                            {data
                                .ingredients
                                .into_iter()
                                .map(|ingredient| view! { <li class="text-lg">{ingredient}</li> })
                                .collect_view()}
                        </ul>
                    </div>
                    <div class="bg-white p-8 rounded-3xl shadow-xl border border-purple-200">
                        <h3 class="text-3xl font-bold text-slate-800 mb-6">"Instructions"</h3>
                        <ol class="space-y-4">
                            {data
                                .steps
                                .into_iter()
                                .enumerate()
                                .map(|(idx, step)| view! {
                                    <li class="flex gap-4">
                                        <span class="w-8 h-8 bg-purple-600 text-white rounded-full flex items-center justify-center font-bold">
                                            {idx + 1}
                                        </span>
                                        <span class="text-lg">{step}</span>
                                    </li>
                                })
                                .collect_view()}
                        </ol>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DraftList {
    Ingredients,
    Steps,
}

impl DraftList {
    fn label(self) -> &'static str {
        match self {
            DraftList::Ingredients => "Ingredients",
            DraftList::Steps => "Steps",
        }
    }

    fn placeholder(self, idx: usize) -> String {
        match self {
            DraftList::Ingredients => format!("Ingredient {}", idx + 1),
            DraftList::Steps => format!("Step {} - Describe what to do", idx + 1),
        }
    }

    fn entries(self, browser: &RecipeBrowser) -> &[String] {
        match self {
            DraftList::Ingredients => &browser.draft().ingredients,
            DraftList::Steps => &browser.draft().steps,
        }
    }

    fn set(self, browser: &mut RecipeBrowser, idx: usize, value: String) {
        let draft = browser.draft_mut();
        match self {
            DraftList::Ingredients => draft.set_ingredient(idx, value),
            DraftList::Steps => draft.set_step(idx, value),
        };
    }

    fn remove(self, browser: &mut RecipeBrowser, idx: usize) {
        let draft = browser.draft_mut();
        match self {
            DraftList::Ingredients => draft.remove_ingredient(idx),
            DraftList::Steps => draft.remove_step(idx),
        };
    }

    fn push(self, browser: &mut RecipeBrowser) {
        let draft = browser.draft_mut();
        match self {
            DraftList::Ingredients => draft.add_ingredient_field(),
            DraftList::Steps => draft.add_step_field(),
        }
    }
}

#[component]
fn DraftEntries(controller: BrowserController, list: DraftList) -> impl IntoView {
    let loading = move || controller.with(RecipeBrowser::is_loading);
    let len = move || controller.with(|browser| list.entries(browser).len());
    view! {
        <div>
            <label class="block text-lg font-bold mb-4 text-slate-900">{list.label()}</label>
            <div class="space-y-3">
                <For
                    each=move || 0..len()
                    key=|idx| *idx
                    children=move |idx| view! {
                        <div class="flex gap-3">
                            <input
                                type="text"
                                class="flex-1 p-4 border-2 border-purple-300 rounded-2xl bg-white"
                                placeholder=list.placeholder(idx)
                                disabled=loading
                                prop:value=move || {
                                    controller.with(|browser| {
                                        list.entries(browser).get(idx).cloned().unwrap_or_default()
                                    })
                                }
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    controller.state.update(|browser| list.set(browser, idx, value));
                                }
                            />
                            {move || (len() > 1).then(|| view! {
                                <button
                                    class="px-4 bg-red-100 text-red-600 rounded-2xl"
                                    disabled=loading
                                    on:click=move |_| controller.state.update(|browser| list.remove(browser, idx))
                                >
                                    "✕"
                                </button>
                            })}
                        </div>
                    }
                />
                <button
                    class="px-6 py-3 bg-purple-100 text-purple-700 rounded-2xl font-semibold"
                    disabled=loading
                    on:click=move |_| controller.state.update(|browser| list.push(browser))
                >
                    {format!("+ Add {}", list.label().trim_end_matches('s'))}
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn AddRecipeForm(controller: BrowserController) -> impl IntoView {
    let loading = move || controller.with(RecipeBrowser::is_loading);
    let draft_field = move |f: fn(&RecipeBrowser) -> String| move || controller.with(f);
    view! {
        <div class="flex-1 p-8 overflow-y-auto">
            <div class="max-w-4xl mx-auto bg-white p-10 rounded-3xl shadow-2xl border border-purple-200 space-y-8">
                <div class="text-center">
                    <h2 class="text-4xl font-bold text-slate-800">"Add New Recipe"</h2>
                    <p class="text-slate-700 text-lg font-medium">
                        "Share your culinary masterpiece with the world"
                    </p>
                </div>
                {move || controller.with(RecipeBrowser::error).map(|error| view! {
                    <div class="p-4 bg-red-100 text-red-700 rounded-2xl">{error}</div>
                })}
                <div class="grid md:grid-cols-2 gap-6">
                    <div>
                        <label class="block text-lg font-bold mb-4 text-slate-900">"Recipe Name"</label>
                        <input
                            type="text"
                            class="w-full p-4 border-2 border-purple-300 rounded-2xl bg-white"
                            placeholder="Enter an amazing recipe name"
                            disabled=loading
                            prop:value=draft_field(|browser| browser.draft().name.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                controller.state.update(|browser| browser.draft_mut().name = value);
                            }
                        />
                    </div>
                    <div>
                        <label class="block text-lg font-bold mb-4 text-slate-900">"Author"</label>
                        <input
                            type="text"
                            class="w-full p-4 border-2 border-purple-300 rounded-2xl bg-white"
                            placeholder="Who's the master chef?"
                            disabled=loading
                            prop:value=draft_field(|browser| browser.draft().author.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                controller.state.update(|browser| browser.draft_mut().author = value);
                            }
                        />
                    </div>
                </div>
                <div>
                    <label class="block text-lg font-bold mb-4 text-slate-900">"Category"</label>
                    <select
                        class="w-full p-4 border-2 border-purple-300 rounded-2xl bg-white"
                        disabled=loading
                        on:change=move |ev| {
                            if let Ok(category) = event_target_value(&ev).parse::<Category>() {
                                controller.state.update(|browser| browser.draft_mut().category = category);
                            }
                        }
                    >
                        {Category::ALL
                            .into_iter()
                            .map(|category| view! {
                                <option
                                    value=category.as_str()
                                    selected=move || controller.with(|browser| browser.draft().category == category)
                                >
                                    {category.icon()}" "{category.label()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
                <DraftEntries controller=controller list=DraftList::Ingredients/>
                <DraftEntries controller=controller list=DraftList::Steps/>
                <div class="flex gap-4">
                    <button
                        class="flex-1 px-8 py-5 bg-purple-600 text-white rounded-2xl font-bold disabled:opacity-50"
                        disabled=move || !controller.with(RecipeBrowser::can_submit)
                        on:click=move |_| controller.add()
                    >
                        {move || if loading() { "Adding..." } else { "Add Recipe" }}
                    </button>
                    <button
                        class="px-8 py-5 bg-slate-300 text-slate-800 rounded-2xl font-bold disabled:opacity-50"
                        disabled=loading
                        on:click=move |_| controller.state.update(RecipeBrowser::close_add_form)
                    >
                        "Cancel"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn RecipeBrowserPage(client: ApiClient) -> impl IntoView {
    let controller = BrowserController::new(client);
    controller.load();

    let main_panel = move || {
        let (show_form, loading, selected) = controller.with(|browser| {
            (
                browser.show_add_form(),
                browser.is_loading(),
                browser.selected_recipe().cloned(),
            )
        });
        match (show_form, selected) {
            (true, _) => view! { <AddRecipeForm controller=controller/> }.into_view(),
            (false, Some(recipe)) => view! { <RecipeDetail controller=controller recipe=recipe/> }.into_view(),
            (false, None) if loading => view! { <SkeletonLoader/> }.into_view(),
            (false, None) => view! {
                <div class="flex-1 flex items-center justify-center">
                    <p class="text-slate-700 text-xl font-medium">"Pick a recipe to get cooking"</p>
                </div>
            }
            .into_view(),
        }
    };

    view! {
        <div class="flex h-screen bg-gradient-to-br from-purple-100 via-pink-50 to-purple-50">
            <div class="absolute top-0 left-0 right-0 z-40 bg-white/90 border-b border-purple-200/50 shadow-xl">
                <div class="flex items-center justify-center py-6 px-6">
                    <div>
                        <h1 class="text-3xl font-bold text-purple-700">"Recipe Kitchen"</h1>
                        <p class="text-sm text-slate-700 font-medium">"Discover & Create Amazing Recipes"</p>
                    </div>
                </div>
            </div>
            <div class="w-80 bg-white/95 border-r border-purple-200/50 flex flex-col shadow-2xl mt-24 relative z-30">
                <div class="p-6 space-y-4">
                    <CategoryDropdown controller=controller/>
                    <button
                        class="w-full p-4 bg-purple-600 text-white rounded-2xl shadow-lg disabled:opacity-50"
                        disabled=move || !controller.with(RecipeBrowser::can_pick_random)
                        on:click=move |_| controller.pick_random()
                    >
                        "Random Recipe"
                    </button>
                    {move || {
                        let (error, form_open) = controller
                            .with(|browser| (browser.error(), browser.show_add_form()));
                        error.filter(|_| !form_open).map(|error| view! {
                            <div class="p-4 bg-red-100 text-red-700 rounded-2xl">{error}</div>
                        })
                    }}
                </div>
                <div class="flex-1 overflow-y-auto px-6 pb-6">
                    <RecipeList controller=controller/>
                </div>
                <div class="p-6">
                    <button
                        class="w-full p-4 bg-purple-600 text-white rounded-2xl shadow-lg disabled:opacity-50"
                        disabled=move || controller.with(RecipeBrowser::is_loading)
                        on:click=move |_| controller.state.update(RecipeBrowser::open_add_form)
                    >
                        "Add Recipe"
                    </button>
                </div>
            </div>
            <div class="flex-1 flex flex-col mt-24">{main_panel}</div>
        </div>
    }
}
