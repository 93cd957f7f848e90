use super::*;

const BASE: &str = "https://www.teasource.com";

const COLLECTIONS_HTML: &str = r#"
<html><body><ul>
  <li>
    <div class="indiv-product"><a href="/collections/green-tea"><img src="g.jpg"></a></div>
    <div class="hp-title"><a href="/collections/green-tea">Green Tea</a></div>
  </li>
  <li>
    <div class="indiv-product"><a href="/collections/black-tea"><img src="b.jpg"></a></div>
    <div class="hp-title"><a href="/collections/black-tea">Black Tea</a></div>
  </li>
  <li>
    <div class="indiv-product"><a href="/collections/teaware"><img src="t.jpg"></a></div>
    <div class="hp-title"><a href="/collections/teaware">Teaware</a></div>
  </li>
  <li><a href="/pages/about">About us</a></li>
</ul></body></html>
"#;

const GRID_HTML: &str = r#"
<html><body>
  <div class="collection-product-grid">
    <div class="indiv-product"><a href="/collections/green-tea/products/dragon-well">Dragon Well</a></div>
    <div class="indiv-product"><a href="/collections/green-tea/products/sencha">Sencha</a></div>
    <div class="indiv-product"><a href="/collections/green-tea/products/dragon-well">Dragon Well again</a></div>
  </div>
  <div class="sidebar"><div class="indiv-product"><a href="/products/not-in-grid">x</a></div></div>
</body></html>
"#;

const PRODUCT_HTML: &str = r#"
<html><head><title>Dragon Well | Green Tea | TeaSource</title></head><body>
  <div class="featured-image-div"><img src="//cdn.teasource.com/dragon-well.jpg"></div>
  <div class="product-description-wrapper">
    <p>Flat, jade-green leaves.</p>
    <p>  </p>
    <p>Toasty chestnut finish.</p>
  </div>
  <div id="product-variants">
    <select>
      <option value="4471">4 ounces - $ 12.00</option>
      <option value="4472">16 ounces - $ 40.00</option>
    </select>
  </div>
</body></html>
"#;

fn link() -> ProductLink {
    ProductLink::new(
        "https://www.teasource.com/collections/green-tea/products/dragon-well",
        Some("Green Tea".to_owned()),
    )
}

#[test]
fn collections_keep_only_mapped_tea_types() {
    let document = Html::parse_document(COLLECTIONS_HTML);
    let collections = parse_collections(&document, BASE);
    assert_eq!(
        collections,
        vec![
            Collection {
                tea_type: "Green Tea",
                url: "https://www.teasource.com/collections/green-tea?view=all".to_owned(),
            },
            Collection {
                tea_type: "Black Tea",
                url: "https://www.teasource.com/collections/black-tea?view=all".to_owned(),
            },
        ]
    );
}

#[test]
fn product_urls_come_from_grid_and_are_deduplicated() {
    let document = Html::parse_document(GRID_HTML);
    let urls = parse_product_urls(&document, BASE);
    assert_eq!(
        urls,
        vec![
            "https://www.teasource.com/collections/green-tea/products/dragon-well".to_owned(),
            "https://www.teasource.com/collections/green-tea/products/sencha".to_owned(),
        ]
    );
}

#[test]
fn extract_product_reads_all_fields() {
    let document = Html::parse_document(PRODUCT_HTML);
    let product = TeaSource::default()
        .extract_product(&document, &link())
        .expect("product should extract");

    assert_eq!(product.name, "Dragon Well");
    assert_eq!(product.tea_type, "Green Tea");
    assert_eq!(
        product.description,
        "Flat, jade-green leaves. Toasty chestnut finish."
    );
    assert_eq!(product.source, "TeaSource");
    assert_eq!(product.product_id, "4471");
    assert!((product.cost - 3.0).abs() < 1e-9, "cost was {}", product.cost);
    assert_eq!(product.url, link().url);
    assert_eq!(
        product.image.as_deref(),
        Some("https://cdn.teasource.com/dragon-well.jpg")
    );
    assert!(product.validate().is_ok());
}

#[test]
fn description_falls_back_to_wrapper_text() {
    let html = PRODUCT_HTML.replace(
        "<p>Flat, jade-green leaves.</p>\n    <p>  </p>\n    <p>Toasty chestnut finish.</p>",
        "Plain description text.",
    );
    let document = Html::parse_document(&html);
    let product = TeaSource::default()
        .extract_product(&document, &link())
        .expect("product should extract");
    assert_eq!(product.description, "Plain description text.");
}

#[test]
fn title_without_splitter_yields_none() {
    let html = PRODUCT_HTML.replace(
        "Dragon Well | Green Tea | TeaSource",
        "Dragon Well Green Tea",
    );
    let document = Html::parse_document(&html);
    assert!(TeaSource::default()
        .extract_product(&document, &link())
        .is_none());
}

#[test]
fn unmatched_price_text_yields_none() {
    let html = PRODUCT_HTML.replace("4 ounces - $ 12.00", "Sample tin");
    let document = Html::parse_document(&html);
    assert!(TeaSource::default()
        .extract_product(&document, &link())
        .is_none());
}

#[test]
fn missing_variants_yields_none() {
    let html = PRODUCT_HTML.replace("product-variants", "other-widget");
    let document = Html::parse_document(&html);
    assert!(TeaSource::default()
        .extract_product(&document, &link())
        .is_none());
}

#[test]
fn link_without_tea_type_yields_none() {
    let document = Html::parse_document(PRODUCT_HTML);
    let untyped = ProductLink::new(link().url, None);
    assert!(TeaSource::default()
        .extract_product(&document, &untyped)
        .is_none());
}

#[test]
fn missing_image_is_optional() {
    let html = PRODUCT_HTML.replace(
        "<div class=\"featured-image-div\"><img src=\"//cdn.teasource.com/dragon-well.jpg\"></div>",
        "",
    );
    let document = Html::parse_document(&html);
    let product = TeaSource::default()
        .extract_product(&document, &link())
        .expect("product should extract");
    assert!(product.image.is_none());
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let source = TeaSource::new("http://127.0.0.1:9000/");
    assert_eq!(source.base_url, "http://127.0.0.1:9000");
}
