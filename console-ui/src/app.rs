use chrono::Utc;
use dispatch_core::chat::{scripted_reply, Sender};
use dispatch_core::resources::Resource;
use dispatch_core::state::{CallField, CallStatus, FakeRisk, Vital};
use dispatch_core::{reduce, ConsoleEvent, ConsoleState};
use leptos::*;
use std::time::Duration;

const AGENT_REPLY_DELAY: Duration = Duration::from_secs(1);

fn emit(console: RwSignal<ConsoleState>, event: ConsoleEvent) {
    console.update(|state| *state = reduce(state.clone(), event));
}

fn status_label(status: CallStatus) -> &'static str {
    match status {
        CallStatus::Connected => "Connected",
        CallStatus::Disconnected => "Disconnected",
        CallStatus::CallbackNeeded => "Callback needed",
    }
}

fn row_key(r: &Resource) -> String {
    format!("{}:{}:{}", r.id, r.eta, r.is_ai_suggested)
}

#[component]
pub fn App() -> impl IntoView {
    let console = create_rw_signal(ConsoleState::seeded(Utc::now()));

    set_interval(
        move || emit(console, ConsoleEvent::Tick { at: Utc::now() }),
        Duration::from_secs(1),
    );

    create_effect(move |_| {
        if let Some(notice) = console.with(|s| s.notice.clone()) {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&notice.message());
            }
            emit(console, ConsoleEvent::DismissNotice);
        }
    });

    view! {
      <div class="console">
        <Header console=console/>
        <div class="layout">
          <section class="panel">
            <CallPanel console=console/>
            <SituationPanel console=console/>
          </section>
          <section class="panel">
            <PositionsPanel console=console/>
            <ResourceTable console=console/>
            <ActionBar console=console/>
          </section>
          <section class="panel">
            <ChatPanel console=console/>
          </section>
        </div>
      </div>
    }
}

#[component]
fn Header(console: RwSignal<ConsoleState>) -> impl IntoView {
    let editing = move || console.with(|s| s.editing);
    view! {
      <header class="row">
        <h1>"Emergency Dispatch"</h1>
        <span class="clock">
          {move || console.with(|s| s.clock.format("%H:%M:%S UTC").to_string())}
        </span>
        <button
          class:active=editing
          on:click=move |_| emit(console, ConsoleEvent::ToggleEditing)
        >
          {move || if editing() { "Save" } else { "Edit" }}
        </button>
      </header>
    }
}

#[component]
fn CallPanel(console: RwSignal<ConsoleState>) -> impl IntoView {
    let editing = move || console.with(|s| s.editing);
    let field = move |label: &'static str, field: CallField, read: fn(&ConsoleState) -> String| {
        view! {
          <label class="stack">
            <span class="meta">{label}</span>
            <input
              prop:value=move || console.with(read)
              disabled=move || !editing()
              on:input=move |ev| emit(console, ConsoleEvent::EditCallField {
                field,
                value: event_target_value(&ev),
              })
            />
          </label>
        }
    };

    view! {
      <h2>"Caller Details"</h2>
      {field("Name", CallField::CallerName, |s| s.call.caller_name.clone())}
      {field("Age", CallField::Age, |s| s.call.age.map(|a| a.to_string()).unwrap_or_default())}
      {field("Phone", CallField::Phone, |s| s.call.phone.clone())}
      {field("Location", CallField::Location, |s| s.call.location.clone())}
      {field("Incident", CallField::IncidentType, |s| s.call.incident_type.clone())}
      <div class="row">
        <b>{move || console.with(|s| status_label(s.call.status))}</b>
        {[CallStatus::Connected, CallStatus::Disconnected, CallStatus::CallbackNeeded]
          .into_iter()
          .map(|status| view! {
            <button on:click=move |_| emit(console, ConsoleEvent::SetCallStatus { status })>
              {status_label(status)}
            </button>
          })
          .collect_view()}
      </div>
    }
}

#[component]
fn SituationPanel(console: RwSignal<ConsoleState>) -> impl IntoView {
    let editing = move || console.with(|s| s.editing);
    let new_symptom = create_rw_signal(String::new());
    let add_symptom = move || {
        let text = new_symptom.get_untracked();
        emit(console, ConsoleEvent::AddSymptom { text });
        new_symptom.set(String::new());
    };
    let vital = move |label: &'static str, vital: Vital| {
        view! {
          <label class="row">
            <input
              type="checkbox"
              disabled=move || !editing()
              prop:checked=move || console.with(|s| match vital {
                Vital::Unconscious => s.situation.is_unconscious,
                Vital::NotBreathing => s.situation.is_not_breathing,
              })
              on:change=move |_| emit(console, ConsoleEvent::ToggleVital { vital })
            />
            {label}
          </label>
        }
    };

    view! {
      <h2>"Situation Assessment"</h2>
      <ul>
        <For
          each=move || {
            console.with(|s| s.situation.symptoms.iter().cloned().enumerate().collect::<Vec<_>>())
          }
          key=|(i, text)| format!("{i}:{text}")
          children=move |(index, text)| view! {
            <li class="row">
              <span>{text}</span>
              <button on:click=move |_| emit(console, ConsoleEvent::RemoveSymptom { index })>
                "x"
              </button>
            </li>
          }
        />
      </ul>
      <div class="row">
        <input
          prop:value=move || new_symptom.get()
          on:input=move |ev| new_symptom.set(event_target_value(&ev))
          placeholder="Add symptom"
        />
        <button on:click=move |_| add_symptom()>"Add"</button>
      </div>
      {vital("Unconscious", Vital::Unconscious)}
      {vital("Not breathing", Vital::NotBreathing)}
      <div class="meta">
        {move || console.with(|s| {
          let risk = match s.situation.fake_risk() {
            FakeRisk::Low => "low",
            FakeRisk::Elevated => "elevated",
          };
          format!("Fake call probability: {}% ({risk})", s.situation.fake_probability)
        })}
      </div>
      <pre class="notes">{move || console.with(|s| s.situation.notes.clone())}</pre>
    }
}

#[component]
fn PositionsPanel(console: RwSignal<ConsoleState>) -> impl IntoView {
    view! {
      <h2>"Responder Positions"</h2>
      <div class="meta">
        {move || console.with(|s| format!(
          "Incident at {} ({:.4}, {:.4})",
          s.call.location, s.call.coordinates.lat, s.call.coordinates.long
        ))}
      </div>
      <ul>
        <For
          each=move || console.with(|s| s.resources.clone())
          key=row_key
          children=move |r| {
            let pos = r.position();
            view! {
              <li class:suggested=r.is_ai_suggested>
                {format!("{} ({:.4}, {:.4}) {} km", r.id, pos.lat, pos.long, r.distance)}
              </li>
            }
          }
        />
      </ul>
    }
}

#[component]
fn ResourceTable(console: RwSignal<ConsoleState>) -> impl IntoView {
    view! {
      <h2>"Available Resources"</h2>
      <table>
        <thead>
          <tr><th></th><th>"Unit"</th><th>"Type"</th><th>"Distance"</th><th>"ETA"</th><th></th></tr>
        </thead>
        <tbody>
          <For
            each=move || console.with(|s| s.resources.clone())
            key=row_key
            children=move |r| {
              let id = r.id.clone();
              let toggle_id = r.id.clone();
              view! {
                <tr class:suggested=r.is_ai_suggested>
                  <td>
                    <input
                      type="checkbox"
                      prop:checked=move || console.with(|s| s.selection.contains(&id))
                      on:change=move |_| {
                        let id = toggle_id.clone();
                        emit(console, ConsoleEvent::ToggleResource { id })
                      }
                    />
                  </td>
                  <td>{r.id.clone()}</td>
                  <td>{r.kind.clone()}</td>
                  <td>{format!("{} km", r.distance)}</td>
                  <td>{format!("{} min", r.eta)}</td>
                  <td>{if r.is_ai_suggested { "AI" } else { "" }}</td>
                </tr>
              }
            }
          />
        </tbody>
      </table>
    }
}

#[component]
fn ActionBar(console: RwSignal<ConsoleState>) -> impl IntoView {
    view! {
      <div class="row actions">
        <button
          class="dispatch"
          on:click=move |_| emit(console, ConsoleEvent::Dispatch { at: Utc::now() })
        >
          {move || console.with(ConsoleState::dispatch_label)}
        </button>
        <button on:click=move |_| emit(console, ConsoleEvent::CancelDispatch)>"Cancel"</button>
        <button on:click=move |_| emit(console, ConsoleEvent::Override)>"Override"</button>
      </div>
    }
}

#[component]
fn ChatPanel(console: RwSignal<ConsoleState>) -> impl IntoView {
    let draft = create_rw_signal(String::new());
    let send = move || {
        let text = draft.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        emit(
            console,
            ConsoleEvent::SendChat {
                text: text.clone(),
                at: Utc::now(),
            },
        );
        draft.set(String::new());
        set_timeout(
            move || {
                let reply = console.with_untracked(|s| scripted_reply(s, &text));
                emit(console, ConsoleEvent::AgentReply { text: reply, at: Utc::now() });
            },
            AGENT_REPLY_DELAY,
        );
    };

    view! {
      <h2>"Agent Assist"</h2>
      <ul class="chat">
        <For
          each=move || console.with(|s| s.chat.messages.clone())
          key=|m| m.id
          children=move |m| {
            let who = match m.sender {
              Sender::Agent => "agent",
              Sender::Dispatcher => "dispatcher",
            };
            view! {
              <li class=who>
                <pre>{m.text}</pre>
                <span class="meta">{m.at.format("%H:%M:%S").to_string()}</span>
              </li>
            }
          }
        />
      </ul>
      <div class="row">
        <input
          prop:value=move || draft.get()
          on:input=move |ev| draft.set(event_target_value(&ev))
          on:keydown=move |ev| if ev.key() == "Enter" { send() }
          placeholder="Ask the agent"
        />
        <button on:click=move |_| send()>"Send"</button>
      </div>
    }
}
