use maud::{Markup, Render, html};

use super::model::{Compound, Molecule};

const NOT_AVAILABLE: &str = "N/A";

pub struct Research;

impl Render for Research {
    fn render(&self) -> Markup {
        html! {
            header ."mb-6" {
                h1 ."text-3xl" { "Compound search" }
            }
            form ."flex mb-6"
                hx-get="/api/compounds"
                hx-target="#compound"
                hx-indicator="#compound-loading"
            {
                input ."flex-1 px-3 py-2 border border-gray-300 rounded-l-md focus:outline-none"
                    type="text"
                    name="name"
                    placeholder="Enter compound name"
                    autocomplete="off"
                    required {}
                input ."px-4 py-2 text-white bg-blue-600 hover:bg-blue-700 rounded-r-md"
                    type="submit"
                    value="Search" {}
            }
            p #compound-loading .htmx-indicator { "Loading..." }
            div #compound {}
        }
    }
}

pub struct CompoundCard<'a> {
    name: &'a str,
    compound: &'a Compound,
}

impl<'a> CompoundCard<'a> {
    pub const fn new(name: &'a str, compound: &'a Compound) -> Self {
        Self { name, compound }
    }
}

impl Render for CompoundCard<'_> {
    fn render(&self) -> Markup {
        let c = self.compound;
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_owned());

        html! {
            div ."rounded-lg bg-white p-6 shadow" {
                h2 ."text-xl font-semibold mb-4" { (self.name) }
                dl ."grid grid-cols-2 gap-2" {
                    dt { "Molecular formula" }
                    dd { (field(&c.molecular_formula)) }
                    dt { "Molecular weight" }
                    dd { (field(&c.molecular_weight)) " g/mol" }
                    dt { "IUPAC name" }
                    dd { (field(&c.iupac_name)) }
                    dt { "SMILES" }
                    dd ."font-mono break-all" { (field(&c.canonical_smiles)) }
                }
                @if let Some(smiles) = &c.canonical_smiles {
                    (Structure(smiles))
                }
            }
        }
    }
}

/// 2D drawing of a SMILES string, rendered client side.
struct Structure<'a>(&'a str);

impl Render for Structure<'_> {
    fn render(&self) -> Markup {
        html! {
            canvas ."mt-4" data-smiles=(self.0) width="250" height="200" {}
        }
    }
}

pub struct MoleculeBank;

impl Render for MoleculeBank {
    fn render(&self) -> Markup {
        html! {
            div ."rounded-lg bg-white px-5 pb-3 pt-6 shadow" {
                h4 ."mb-6 text-xl font-semibold" { "Molecules" }
                input ."mb-4 w-full rounded-lg border border-gray-300 px-4 py-3 outline-none"
                    type="search"
                    name="q"
                    placeholder="Search molecule"
                    hx-get="/api/molecules"
                    hx-trigger="input changed delay:500ms, search"
                    hx-target="#molecule-rows" {}
                table ."w-full" {
                    thead {
                        tr ."bg-gray-100 text-sm uppercase" {
                            th ."p-3 text-left" { "Molecule name" }
                            th ."p-3" { "Smile structure" }
                            th ."p-3" { "Molecular weight (g/mol)" }
                            th ."p-3" { "Category usage" }
                        }
                    }
                    tbody #molecule-rows hx-get="/api/molecules" hx-trigger="load" {}
                }
            }
        }
    }
}

pub struct MoleculeRows<'a>(pub &'a [Molecule]);

impl Render for MoleculeRows<'_> {
    fn render(&self) -> Markup {
        html! {
            @for m in self.0 {
                tr ."border-b" {
                    td ."p-3" { (m.name) }
                    td ."p-3" { (Structure(&m.smiles)) }
                    td ."p-3 text-center" { (m.molecular_weight) }
                    td ."p-3 text-center" { (m.category) }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_render_molecule_row() {
        let molecules = [Molecule {
            name: "Ethanol".into(),
            smiles: "CCO".into(),
            molecular_weight: "46.07".into(),
            category: "Solvent".into(),
        }];
        let expected = html! {
            tr class="border-b" {
                td class="p-3" { "Ethanol" }
                td class="p-3" { canvas class="mt-4" data-smiles="CCO" width="250" height="200" {} }
                td class="p-3 text-center" { "46.07" }
                td class="p-3 text-center" { "Solvent" }
            }
        }
        .into_string();

        let actual = MoleculeRows(&molecules).render().into_string();

        assert_eq!(actual, expected);
    }

    #[test]
    fn should_render_missing_compound_fields_as_not_available() {
        let compound = Compound {
            molecular_formula: Some("C2H6O".into()),
            molecular_weight: None,
            canonical_smiles: None,
            iupac_name: None,
        };

        let actual = CompoundCard::new("Ethanol", &compound)
            .render()
            .into_string();

        assert!(actual.contains("<dd>C2H6O</dd>"));
        assert!(actual.contains("<dd>N/A g/mol</dd>"));
        assert!(!actual.contains("canvas"));
    }

    #[test]
    fn should_load_molecule_rows_on_page_load() {
        let actual = MoleculeBank.render().into_string();

        assert!(actual.contains(
            r#"<tbody id="molecule-rows" hx-get="/api/molecules" hx-trigger="load"></tbody>"#
        ));
    }
}
