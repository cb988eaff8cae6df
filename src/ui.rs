use crate::coupons::{CouponStatus, status_on};
use crate::models::{Business, Coupon};
use chrono::NaiveDate;

pub fn render_index(businesses: &[Business]) -> String {
    let cards: String = businesses
        .iter()
        .map(|b| {
            format!(
                r#"<a class="card" href="/brands/{slug}"><h2>{name}</h2><p class="meta">{category} &middot; {rating:.1}&#9733; ({reviews})</p><p>{description}</p></a>"#,
                slug = escape(&b.slug),
                name = escape(&b.name),
                category = escape(&b.category),
                rating = b.rating,
                reviews = b.review_count,
                description = escape(&b.description),
            )
        })
        .collect();
    let body = if cards.is_empty() {
        r#"<p class="empty">No businesses listed yet.</p>"#.to_string()
    } else {
        cards
    };
    PAGE_HTML
        .replace("{{TITLE}}", "Downtown Guide")
        .replace("{{BODY}}", &format!("<h1>Downtown Guide</h1><section class=\"grid\">{body}</section>"))
}

/// Brand preview with the business's live coupons.
pub fn render_brand(business: &Business, coupons: &[Coupon], today: NaiveDate) -> String {
    let deals: String = coupons
        .iter()
        .filter(|c| c.business_id == business.id && status_on(c, today) == CouponStatus::Active)
        .map(|c| {
            format!(
                r#"<li><strong>{title}</strong> <code>{code}</code> <span class="meta">until {end}</span></li>"#,
                title = escape(&c.title),
                code = escape(&c.code),
                end = c.end_date,
            )
        })
        .collect();
    let deals = if deals.is_empty() {
        r#"<p class="empty">No current deals.</p>"#.to_string()
    } else {
        format!("<ul>{deals}</ul>")
    };
    let hours: String = business
        .hours
        .iter()
        .map(|h| {
            format!(
                "<li>{} {}&ndash;{}</li>",
                escape(&h.day),
                escape(&h.open),
                escape(&h.close)
            )
        })
        .collect();
    let tags: String = business
        .tags
        .iter()
        .map(|t| format!(r#"<span class="tag">{}</span>"#, escape(t)))
        .collect();

    let body = format!(
        r#"<a href="/">&larr; All businesses</a>
<h1>{name}</h1>
<p class="meta">{category} &middot; {price} &middot; {rating:.1}&#9733; ({reviews} reviews)</p>
<p>{description}</p>
<p>{address}</p>
<div>{tags}</div>
<h2>Deals</h2>{deals}
<h2>Hours</h2><ul>{hours}</ul>"#,
        name = escape(&business.name),
        category = escape(&business.category),
        price = escape(&business.price_range),
        rating = business.rating,
        reviews = business.review_count,
        description = escape(&business.description),
        address = escape(&business.address),
    );
    PAGE_HTML
        .replace("{{TITLE}}", &escape(&business.name))
        .replace("{{BODY}}", &body)
}

pub fn render_not_found(slug: &str) -> String {
    PAGE_HTML.replace("{{TITLE}}", "Not found").replace(
        "{{BODY}}",
        &format!(
            r#"<h1>Business not found</h1><p>We couldn't find a business called "{}".</p><a href="/">Browse the directory</a>"#,
            escape(slug)
        ),
    )
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f7f4ee;
      --ink: #222;
      --accent: #c2410c;
      --card: #fff;
    }

    body {
      margin: 0 auto;
      max-width: 960px;
      padding: 32px 20px;
      font-family: system-ui, sans-serif;
      background: var(--bg);
      color: var(--ink);
    }

    a {
      color: var(--accent);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
      gap: 16px;
    }

    .card {
      display: block;
      padding: 16px;
      border-radius: 12px;
      background: var(--card);
      color: inherit;
      text-decoration: none;
      box-shadow: 0 8px 24px rgba(0, 0, 0, 0.06);
    }

    .meta,
    .empty {
      color: #666;
    }

    .tag {
      display: inline-block;
      margin-right: 6px;
      padding: 2px 8px;
      border-radius: 999px;
      background: #fde7d9;
      font-size: 0.85em;
    }
  </style>
</head>
<body>
{{BODY}}
</body>
</html>
"#;
