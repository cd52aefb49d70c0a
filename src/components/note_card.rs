use crate::components::ui::{Badge, BadgeVariant, Card, CardContent, CardHeader, CardTitle};
use crate::models::{format_long_date, Note};
use icons::{Check, Eye, Heart};
use leptos::prelude::*;

/// Longest description shown on a card before it is cut.
const PREVIEW_CHARS: usize = 120;

pub(crate) fn description_preview(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[component]
pub fn NoteCard(note: Note) -> impl IntoView {
    let href = format!("/notes/{}", note.id);
    let preview = description_preview(&note.description);
    let date = format_long_date(&note.created_at);
    let verified = note.is_verified;

    view! {
        <a href=href class="block h-full transition-transform hover:-translate-y-0.5">
            <Card class="h-full">
                <CardHeader>
                    <div class="flex items-start justify-between gap-2">
                        <CardTitle class="text-base line-clamp-2">{note.title}</CardTitle>
                        <Show when=move || verified fallback=|| ().into_view()>
                            <Badge variant=BadgeVariant::Verified>
                                <Check />
                                "Verified"
                            </Badge>
                        </Show>
                    </div>
                    <div class="flex flex-wrap gap-1.5">
                        <Badge variant=BadgeVariant::Outline>{note.grade.to_string()}</Badge>
                        <Badge>{note.subject}</Badge>
                    </div>
                </CardHeader>
                <CardContent class="flex flex-col gap-3">
                    <p class="text-sm text-muted-foreground">{preview}</p>
                    <div class="flex items-center justify-between text-xs text-muted-foreground">
                        <span class="inline-flex items-center gap-3">
                            <span class="inline-flex items-center gap-1">
                                <Heart class="size-3.5" />
                                {note.likes}
                            </span>
                            <span class="inline-flex items-center gap-1">
                                <Eye class="size-3.5" />
                                {note.views}
                            </span>
                        </span>
                        <span>{date}</span>
                    </div>
                </CardContent>
            </Card>
        </a>
    }
}
