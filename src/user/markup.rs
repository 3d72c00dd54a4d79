use maud::{Markup, Render, html};

use super::model::Profile;

pub struct Header<'a>(pub &'a Profile);

impl Render for Header<'_> {
    fn render(&self) -> Markup {
        html! {
            header #user-header ."flex items-center mb-4" {
                img ."w-12 h-12 rounded-full mr-3"
                    src=(self.0.picture())
                    alt="User avatar" {}
                h2 .text-2xl { (self.0.display_name()) }
            }
        }
    }
}

pub struct Settings<'a>(pub &'a Profile);

impl Render for Settings<'_> {
    fn render(&self) -> Markup {
        html! {
            (Header(self.0))
            (SettingsForm::new(self.0))
        }
    }
}

pub struct SettingsForm<'a> {
    profile: &'a Profile,
    saved: bool,
}

impl<'a> SettingsForm<'a> {
    pub const fn new(profile: &'a Profile) -> Self {
        Self {
            profile,
            saved: false,
        }
    }

    pub const fn saved(profile: &'a Profile) -> Self {
        Self {
            profile,
            saved: true,
        }
    }
}

const INPUT_CLASS: &str = "mb-3 w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none";

impl Render for SettingsForm<'_> {
    fn render(&self) -> Markup {
        // reads the chosen file into a data url before the form is submitted
        let photo_handler = r"on change
                if my.files.length > 0
                    call readAsDataUrl(my.files[0])
                    set value of #photo to it";

        html! {
            form #settings-form ."max-w-md"
                hx-put="/api/users/me"
                hx-target="this"
                hx-swap="outerHTML"
            {
                label for="first_name" { "First name" }
                input #first_name .(INPUT_CLASS) type="text" name="first_name"
                    value=(self.profile.first_name()) {}

                label for="last_name" { "Last name" }
                input #last_name .(INPUT_CLASS) type="text" name="last_name"
                    value=(self.profile.last_name()) {}

                label for="photo-file" { "Photo" }
                input #photo-file .(INPUT_CLASS) type="file" accept="image/*" _=(photo_handler) {}
                input #photo type="hidden" name="photo" value="" {}

                input ."px-4 py-2 text-white bg-blue-600 hover:bg-blue-700 rounded-md"
                    type="submit"
                    value="Save" {}

                @if self.saved {
                    span ."ml-3 text-green-700" { "Profile saved" }
                }
            }
        }
    }
}
