use std::convert::Infallible;

use axum::{
    body::Body,
    response::{IntoResponse, IntoResponseParts, Response, ResponseParts},
};
use maud::{DOCTYPE, Markup, Render, html};
use reqwest::header::CONTENT_LENGTH;

const TITLE: &str = "Drug Discovery Dashboard";

struct Head<'a>(&'a str);

impl Render for Head<'_> {
    fn render(&self) -> Markup {
        html! {
            head {
                meta charset="utf-8" {}
                title { (self.0) }
                script src="https://unpkg.com/htmx.org@2.0.4" {}
                script src="https://unpkg.com/htmx-ext-ws@2.0.3/ws.js" {}
                script src="https://unpkg.com/hyperscript.org@0.9.13" {}
                script src="https://unpkg.com/smiles-drawer@2.0.1/dist/smiles-drawer.min.js" {}

                script src="https://unpkg.com/@tailwindcss/browser@4" {}
                script src="/static/scripts.js" {}

                link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.6.0/css/all.min.css" {}

                meta name="htmx-config" content=r#"{"responseHandling": [{"code":".*", "swap": true}]}"# {}
            }
        }
    }
}

#[derive(PartialEq, Clone, Copy)]
pub enum Page {
    Home,
    Research,
    Molecules,
    Chat,
    Settings,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Home,
        Page::Research,
        Page::Molecules,
        Page::Chat,
        Page::Settings,
    ];

    const fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Research => "/research",
            Page::Molecules => "/molecules",
            Page::Chat => "/chat",
            Page::Settings => "/settings",
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Page::Home => "Dashboard",
            Page::Research => "Compound search",
            Page::Molecules => "Molecule bank",
            Page::Chat => "Chat",
            Page::Settings => "Settings",
        }
    }

    const fn icon(&self) -> &'static str {
        match self {
            Page::Home => "fa-solid fa-house",
            Page::Research => "fa-solid fa-flask",
            Page::Molecules => "fa-solid fa-atom",
            Page::Chat => "fa-regular fa-message",
            Page::Settings => "fa-solid fa-gears",
        }
    }
}

struct Nav;

impl Render for Nav {
    fn render(&self) -> Markup {
        html! {
            nav ."flex flex-col w-56 bg-gray-900 text-gray-200 p-4 space-y-2" {
                @for page in Page::ALL {
                    a ."px-3 py-2 rounded-md hover:bg-gray-700 flex items-center"
                        href=(page.path())
                    {
                        i .mr-2 .(page.icon()) {}
                        (page.label())
                    }
                }
            }
        }
    }
}

fn base(w: &Wrappable) -> Markup {
    html! {
        (DOCTYPE)
        html {
            (Head(TITLE))

            body ."h-screen flex bg-gray-100" {
                (Nav)
                main #screen ."flex-1 overflow-auto p-6" {
                    (w.content)
                }
            }
        }
    }
}

/// Content to be embedded into the full page layout by [`wrap_in_base`].
#[derive(Clone)]
pub struct Wrappable {
    content: Markup,
}

impl Wrappable {
    pub fn new(content: impl Render) -> Self {
        Self {
            content: content.render(),
        }
    }
}

impl IntoResponseParts for Wrappable {
    type Error = Infallible;

    fn into_response_parts(
        self,
        mut res: ResponseParts,
    ) -> core::result::Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

impl IntoResponse for Wrappable {
    fn into_response(self) -> axum::response::Response {
        (self, ()).into_response()
    }
}

pub async fn wrap_in_base(mut resp: Response) -> impl IntoResponse {
    if let Some(w) = resp.extensions_mut().remove::<Wrappable>() {
        resp.headers_mut().remove(CONTENT_LENGTH);
        *resp.body_mut() = Body::new(base(&w).into_string());
        return resp;
    }

    resp
}

pub struct Home;

impl Render for Home {
    fn render(&self) -> Markup {
        html! {
            header ."mb-6" {
                h1 ."text-3xl" { (TITLE) }
            }
            div ."grid grid-cols-2 gap-4" {
                @for page in &Page::ALL[1..] {
                    a ."rounded-lg bg-white p-6 shadow hover:bg-gray-50" href=(page.path()) {
                        i .mr-2 .(page.icon()) {}
                        (page.label())
                    }
                }
            }
        }
    }
}

/// Error banner swapped into `#errors` out of band.
pub struct ErrorBanner<'a>(pub &'a str);

impl Render for ErrorBanner<'_> {
    fn render(&self) -> Markup {
        html! {
            div #errors ."text-red-600 mb-4" hx-swap-oob="true" { (self.0) }
        }
    }
}
