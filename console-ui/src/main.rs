mod app;

fn main() {
    leptos::mount_to_body(|| leptos::view! { <app::App/> });
}
