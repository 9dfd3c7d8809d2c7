// tests/species_page.rs
use rls_data::data::ScrapedSpecies;
use rls_data::specs::{sitemap::{self, LinkKind}, species_page::SpeciesPageSpec};

fn parse(url: &str, body: &str) -> ScrapedSpecies {
    SpeciesPageSpec::new().unwrap().parse(url, body)
}

fn expected(id: &str, name: &str, common_name: &str, url: &str, images: &[&str]) -> ScrapedSpecies {
    ScrapedSpecies {
        id: id.into(),
        name: name.into(),
        common_name: common_name.into(),
        url: url.into(),
        image_urls: images.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn sitemap_skips_image_links() {
    let body = r#"
        <urlset>
            <url>
                <loc>https://reeflifesurvey.com/species/labroides-dimidiatus/</loc>
            </url>
            <url>
                <loc>https://images.reeflifesurvey.com/not_a_species_page</loc>
            </url>
        </urlset>
    "#;
    let links = sitemap::parse_sitemap(body, &["https://images.reeflifesurvey".into()]).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "https://reeflifesurvey.com/species/labroides-dimidiatus/");
    assert_eq!(links[0].kind, LinkKind::Species);
}

#[test]
fn all_names_and_image() {
    let url = "https://reeflifesurvey.com/species/labroides-dimidiatus/";
    let body = concat!(
        "<html>",
        r#"<h1 class="MuiTypography-root">Labroides dimidiatus</h1>"#,
        r#"<span class="MuiTypography-root MuiTypography-subtitle1">Cleaner wrasse | Blue Diesel Wrasse</span>"#,
        r#"<div><div class="swiper"><div><img src="image1.jpg"></div></div></div>"#,
        "</html>",
    );
    assert_eq!(
        parse(url, body),
        expected(
            "labroides-dimidiatus",
            "Labroides dimidiatus",
            "Cleaner wrasse, Blue Diesel Wrasse",
            url,
            &["image1.jpg"],
        )
    );
}

#[test]
fn missing_names() {
    let url = "https://reeflifesurvey.com/species/fish2/";
    let body = concat!(
        "<html>",
        r#"<h1 class="MuiTypography-root"></h1>"#,
        r#"<span class="MuiTypography-root MuiTypography-subtitle1"></span>"#,
        "</html>",
    );
    assert_eq!(parse(url, body), expected("fish2", "", "", url, &[]));
}

#[test]
fn unexpected_html_structure() {
    let url = "https://reeflifesurvey.com/species/fish3/";
    let body = "<html><div>Some unexpected structure</div></html>";
    assert_eq!(parse(url, body), expected("fish3", "", "", url, &[]));
}

#[test]
fn name_no_images() {
    let url = "https://reeflifesurvey.com/species/fish4/";
    let body = r#"<html><h1 class="MuiTypography-root">Fish Name</h1></html>"#;
    assert_eq!(parse(url, body), expected("fish4", "Fish Name", "", url, &[]));
}

#[test]
fn images_outside_the_gallery_are_ignored() {
    let url = "https://reeflifesurvey.com/species/fish5/";
    let body = r#"<html><img src="logo.png">
        <h1 class="MuiTypography-root">Fish</h1>
        <div class="swiper"><img src="a.jpg"><img src="b.jpg"></div></html>"#;
    assert_eq!(parse(url, body).image_urls, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
}
