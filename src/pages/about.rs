use crate::components::ui::{Button, ButtonSize, ButtonVariant, Card, CardContent};
use crate::pages::AppLayout;
use leptos::prelude::*;

const FEATURES: [(&str, &str); 3] = [
    (
        "Organized Content",
        "Notes are neatly categorized by grade level and subject, making it easy to find exactly what you need.",
    ),
    (
        "Community-Driven",
        "Our platform thrives on student contributions, creating a diverse library of study materials.",
    ),
    (
        "Verified Content",
        "Our verification system highlights high-quality notes that have been reviewed for accuracy.",
    ),
];

const VALUES: [(&str, &str); 4] = [
    (
        "Trust & Safety",
        "We prioritize creating a safe environment where students can trust the content they access.",
    ),
    (
        "Educational Excellence",
        "We believe in the power of shared knowledge to elevate everyone's learning experience.",
    ),
    (
        "Inclusivity",
        "Education should be accessible to all, whatever a student's background.",
    ),
    (
        "Community Support",
        "Students help each other succeed by sharing notes and knowledge.",
    ),
];

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <AppLayout>
            <div class="mx-auto flex max-w-4xl flex-col gap-12 py-8">
                <section class="text-center">
                    <h1 class="mb-4 text-4xl font-bold tracking-tight">"About NonNotes"</h1>
                    <p class="text-lg text-muted-foreground">
                        "Empowering students to learn together through collaborative note-sharing"
                    </p>
                </section>

                <section class="flex flex-col gap-4">
                    <h2 class="text-2xl font-bold">"Our Mission"</h2>
                    <p class="text-muted-foreground">
                        "NonNotes helps students learn more effectively by sharing knowledge. "
                        "Students in grades 6-12 can discover, share, and access class notes organized "
                        "by subject and grade level."
                    </p>
                    <div>
                        <Button href="/signup">"Join Our Community"</Button>
                    </div>
                </section>

                <section>
                    <h2 class="mb-6 text-center text-2xl font-bold">"What Makes NonNotes Special"</h2>
                    <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
                        {FEATURES
                            .iter()
                            .map(|(title, body)| view! {
                                <Card>
                                    <CardContent class="pt-6">
                                        <h3 class="mb-2 text-lg font-semibold">{*title}</h3>
                                        <p class="text-sm text-muted-foreground">{*body}</p>
                                    </CardContent>
                                </Card>
                            })
                            .collect_view()}
                    </div>
                </section>

                <section>
                    <h2 class="mb-6 text-center text-2xl font-bold">"Our Values"</h2>
                    <div class="grid grid-cols-1 gap-6 md:grid-cols-2">
                        {VALUES
                            .iter()
                            .map(|(title, body)| view! {
                                <div>
                                    <h3 class="mb-1 font-semibold">{*title}</h3>
                                    <p class="text-sm text-muted-foreground">{*body}</p>
                                </div>
                            })
                            .collect_view()}
                    </div>
                </section>

                <section class="rounded-xl bg-muted p-8 text-center">
                    <h2 class="mb-2 text-2xl font-bold">"Ready to Join NonNotes?"</h2>
                    <p class="mb-6 text-muted-foreground">
                        "Become part of our growing community of students sharing knowledge."
                    </p>
                    <div class="flex justify-center gap-4">
                        <Button size=ButtonSize::Lg href="/signup">"Sign Up Now"</Button>
                        <Button size=ButtonSize::Lg variant=ButtonVariant::Outline href="/notes">
                            "Browse Notes"
                        </Button>
                    </div>
                </section>
            </div>
        </AppLayout>
    }
}
