use crate::components::ui::{
    Alert, AlertDescription, AlertTitle, Button, ButtonSize, ButtonVariant, Card, CardContent,
    ErrorAlert, Input, Label, NativeSelect, Spinner, Textarea,
};
use crate::models::{Grade, Subject};
use crate::notes::upload::{storage_path, upload_note, validate_file, SelectedFile, UploadForm};
use crate::pages::AppLayout;
use crate::state::AppContext;
use crate::util::{format_size, now_ms, random_token};
use icons::{FileText, Upload};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UploadTab {
    Form,
    Guidelines,
}

#[component]
fn UploadGuidelines() -> impl IntoView {
    let rules = [
        "Do not upload copyrighted material you don't have rights to",
        "No inappropriate or offensive content",
        "No personal information of others",
        "Files must be clear and legible",
        "Maximum file size: 10MB",
    ];
    let quality = [
        "Ensure your notes are well-organized and structured",
        "Use clear headings and subheadings",
        "Include relevant diagrams or illustrations when helpful",
        "Proofread for spelling and grammar errors",
        "Provide accurate information based on curriculum",
    ];
    let dos = [
        "Upload clear, high-quality scans or PDFs",
        "Properly categorize by subject and grade",
        "Add descriptive titles and summaries",
        "Mention if content is from textbooks or class notes",
    ];
    let donts = [
        "Don't upload blurry or illegible content",
        "Don't submit incomplete notes",
        "Don't include test answers or exam materials",
        "Don't upload duplicate content",
    ];

    let list = |items: &[&'static str]| {
        let items = items.to_vec();
        view! {
            <ul class="mt-2 list-disc space-y-1 pl-5">
                {items.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
            </ul>
        }
    };

    view! {
        <div class="flex flex-col gap-4">
            <Alert class="border-destructive/30">
                <AlertTitle>"Important Rules"</AlertTitle>
                <AlertDescription>{list(&rules)}</AlertDescription>
            </Alert>
            <Alert>
                <AlertTitle>"Guidelines for Quality Notes"</AlertTitle>
                <AlertDescription>{list(&quality)}</AlertDescription>
            </Alert>
            <div class="grid gap-4 md:grid-cols-2">
                <Alert class="border-emerald-600/30">
                    <AlertTitle>"Do's"</AlertTitle>
                    <AlertDescription>{list(&dos)}</AlertDescription>
                </Alert>
                <Alert class="border-amber-500/30">
                    <AlertTitle>"Don'ts"</AlertTitle>
                    <AlertDescription>{list(&donts)}</AlertDescription>
                </Alert>
            </div>
            <Alert>
                <AlertTitle>"Image Quality Notice"</AlertTitle>
                <AlertDescription>
                    "If you're uploading scanned images or photos of handwritten notes, please indicate in the description whether the images are clear and legible. This helps other students decide if the notes will be useful for them."
                </AlertDescription>
            </Alert>
        </div>
    }
}

#[component]
fn UploadFormView() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let title: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let grade: RwSignal<String> = RwSignal::new(String::new());
    let subject: RwSignal<String> = RwSignal::new(String::new());
    let file: RwSignal<Option<SelectedFile>> = RwSignal::new(None);
    let reading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let uploading: RwSignal<bool> = RwSignal::new(false);

    let on_file_change = move |ev: web_sys::Event| {
        let Some(picked) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };

        if let Err(e) = validate_file(&picked.type_(), picked.size() as u64) {
            file.set(None);
            error.set(Some(e.to_string()));
            return;
        }

        error.set(None);
        reading.set(true);
        spawn_local(async move {
            match read_file(&picked).await {
                Ok(bytes) => file.set(Some(SelectedFile {
                    name: picked.name(),
                    mime: picked.type_(),
                    bytes,
                })),
                Err(e) => {
                    log::error!("Error reading selected file: {e}");
                    file.set(None);
                    error.set(Some("Could not read the selected file".to_string()));
                }
            }
            reading.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() || reading.get_untracked() {
            return;
        }

        let form = UploadForm {
            title: title.get_untracked(),
            description: description.get_untracked(),
            grade: Grade::parse(&grade.get_untracked()),
            subject: subject.get_untracked().parse::<Subject>().ok(),
            file: file.get_untracked(),
        };
        let user = app_state.0.user_untracked();
        let client = app_state.0.client.get_untracked();

        uploading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = match form.validate(user.as_ref()) {
                Ok(new_note) => {
                    let path = storage_path(new_note.owner_id, &new_note.file.name, &random_token(), now_ms());
                    upload_note(&client, &new_note, &path).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(note) => {
                    let href = format!("/notes/{}", note.id);
                    navigate.with_value(|nav| nav(&href, Default::default()));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            uploading.set(false);
        });
    };

    let grades: Vec<(String, String)> = Grade::all()
        .map(|g| (g.value().to_string(), g.to_string()))
        .collect();
    let subjects: Vec<(String, String)> = Subject::all()
        .map(|s| (s.to_string(), s.to_string()))
        .collect();

    view! {
        <form class="flex flex-col gap-4" on:submit=on_submit>
            <div class="flex flex-col gap-1.5">
                <Label html_for="title">"Title"</Label>
                <Input id="title" placeholder="e.g. Algebra Basics" bind_value=title required=true />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="description">"Description"</Label>
                <Textarea
                    id="description"
                    placeholder="What does this note cover?"
                    bind_value=description
                    required=true
                />
            </div>

            <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="grade">"Grade"</Label>
                    <NativeSelect id="grade" options=grades bind_value=grade placeholder="Select grade" />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="subject">"Subject"</Label>
                    <NativeSelect id="subject" options=subjects bind_value=subject placeholder="Select subject" />
                </div>
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="file">"PDF file"</Label>
                <label
                    for="file"
                    class="flex cursor-pointer flex-col items-center gap-2 rounded-lg border-2 border-dashed p-6 text-center text-sm text-muted-foreground hover:bg-accent/40"
                >
                    <Upload class="size-6" />
                    {move || match file.get() {
                        Some(f) => view! {
                            <span class="inline-flex items-center gap-2 text-foreground">
                                <FileText class="size-4" />
                                {format!("{} ({})", f.name, format_size(f.size()))}
                            </span>
                        }
                        .into_any(),
                        None => view! { <span>"Click to choose a PDF"</span> }.into_any(),
                    }}
                    <span class="text-xs">"Only PDF files. Maximum size: 10MB."</span>
                </label>
                <input id="file" type="file" accept="application/pdf" class="hidden" on:change=on_file_change />
            </div>

            <ErrorAlert message=error />

            <Button class="w-full" attr:disabled=move || uploading.get() || reading.get()>
                <Show when=move || uploading.get() || reading.get() fallback=|| ().into_view()>
                    <Spinner />
                </Show>
                {move || if uploading.get() { "Uploading..." } else { "Upload Note" }}
            </Button>
        </form>
    }
}

#[component]
pub fn CreateNotePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let tab: RwSignal<UploadTab> = RwSignal::new(UploadTab::Form);
    let signed_in = move || app_state.0.auth.with(|a| a.is_signed_in());

    view! {
        <AppLayout>
            <Show
                when=signed_in
                fallback=|| view! {
                    <div class="mx-auto max-w-md rounded-xl border p-8 text-center">
                        <h2 class="mb-4 text-2xl font-bold">"Sign in required"</h2>
                        <p class="mb-6 text-muted-foreground">"You need to be signed in to upload notes."</p>
                        <Button href="/login">"Sign In"</Button>
                    </div>
                }
            >
                <div class="mx-auto flex max-w-2xl flex-col gap-6">
                    <h1 class="text-2xl font-bold">"Upload a New Note"</h1>

                    {move || {
                        let current = tab.get();
                        let variant = |t: UploadTab| {
                            if current == t { ButtonVariant::Outline } else { ButtonVariant::Ghost }
                        };
                        view! {
                            <div class="inline-flex w-fit gap-1 rounded-lg bg-muted p-1">
                                <Button size=ButtonSize::Sm variant=variant(UploadTab::Form) on:click=move |_| tab.set(UploadTab::Form)>
                                    <Upload />
                                    "Upload Form"
                                </Button>
                                <Button size=ButtonSize::Sm variant=variant(UploadTab::Guidelines) on:click=move |_| tab.set(UploadTab::Guidelines)>
                                    <FileText />
                                    "Guidelines"
                                </Button>
                            </div>
                        }
                    }}

                    <Card>
                        <CardContent>
                            <Show when=move || tab.get() == UploadTab::Form fallback=|| view! { <UploadGuidelines /> }>
                                <UploadFormView />
                            </Show>
                        </CardContent>
                    </Card>
                </div>
            </Show>
        </AppLayout>
    }
}
