/// HTML rendering for the quiz pages and ranking fragments
use crate::models::{Question, RatingBounds, ScoredCandidate};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

pub const UNAVAILABLE_MESSAGE: &str = "データ取得に失敗しました";
pub const NO_MATCH_MESSAGE: &str = "条件に合う企業が見つかりませんでした";
pub const UNKNOWN_REGION: &str = "不明";

/// Colors end up inside a style attribute, so only hex codes and plain names pass.
fn safe_color(raw: &str) -> &str {
    let raw = raw.trim();
    let is_hex = raw.len() > 1
        && raw.len() <= 9
        && raw.starts_with('#')
        && raw[1..].chars().all(|c| c.is_ascii_hexdigit());
    let is_name = !raw.is_empty() && raw.len() <= 32 && raw.chars().all(|c| c.is_ascii_alphabetic());
    if is_hex || is_name {
        raw
    } else {
        "transparent"
    }
}

fn safe_href(raw: &str) -> &str {
    let raw = raw.trim();
    if raw.starts_with("https://") || raw.starts_with("http://") {
        raw
    } else {
        "#"
    }
}

/// Rounded score as shown to visitors; whole numbers keep their `.0`.
fn score_text(item: &ScoredCandidate) -> String {
    // Debug formatting of f64 always carries a fractional part
    format!("{:?}", item.display_score())
}

fn name_link(item: &ScoredCandidate) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
        encode_double_quoted_attribute(safe_href(&item.candidate.url)),
        encode_text(&item.candidate.name)
    )
}

fn color_block(item: &ScoredCandidate) -> String {
    format!(
        "<div class=\"color-block\">\
         <div class=\"half\" style=\"background-color: {};\"></div>\
         <div class=\"half\" style=\"background-color: {};\"></div>\
         </div>",
        safe_color(&item.candidate.color_primary),
        safe_color(&item.candidate.color_secondary)
    )
}

/// Table view followed by card view of the ranked matches
pub fn results_fragment(results: &[ScoredCandidate]) -> String {
    if results.is_empty() {
        return message_fragment(NO_MATCH_MESSAGE);
    }

    let mut table = String::from(
        "<div id=\"table-view\" class=\"table-wrapper\"><table>\
         <thead><tr>\
         <th>会社名 (リンク)</th><th>色傾向</th><th>価値観</th><th>スコア</th>\
         </tr></thead><tbody>",
    );
    let mut cards = String::from("<div id=\"card-view\">");

    for item in results {
        let link = name_link(item);
        let colors = color_block(item);
        let value = encode_text(&item.candidate.value);
        let score = score_text(item);

        // Writing into a String cannot fail
        let _ = write!(
            table,
            "<tr><td>{}</td><td class=\"color-column\">{}</td>\
             <td><div class=\"clamp\">{}</div></td><td>{}</td></tr>",
            link, colors, value, score
        );
        let _ = write!(
            cards,
            "<div class=\"card\"><h3>{}</h3>{}\
             <div class=\"value\">{}</div>\
             <div class=\"score\">スコア: {}</div></div>",
            link, colors, value, score
        );
    }

    table.push_str("</tbody></table></div>");
    cards.push_str("</div>");
    table + &cards
}

pub fn message_fragment(message: &str) -> String {
    format!("<p>{}</p>", encode_text(message))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html lang=\"ja\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title></head><body>{}</body></html>",
        encode_text(title),
        body
    )
}

/// Submits the quiz in the background and swaps the returned fragment into
/// `#results`. Without scripts the form falls back to a plain GET.
const RESULTS_SCRIPT: &str = "<script>\
document.getElementById('quiz').addEventListener('submit', async (event) => {\
event.preventDefault();\
const results = document.getElementById('results');\
const query = new URLSearchParams(new FormData(event.target)).toString();\
try {\
const response = await fetch('/api/rank?' + query);\
results.innerHTML = await response.text();\
} catch (e) {\
results.innerHTML = '<p>データ取得に失敗しました</p>';\
}\
});\
</script>";

/// Quiz page: one rating scale per question, submitted to `/api/rank`
pub fn index_page(region: &str, questions: &[Question], bounds: &RatingBounds) -> String {
    let mut body = format!(
        "<header><h1>価値観診断</h1><p class=\"region\">アクセス地域: {}</p>\
         <p><a href=\"/desc_answer\">回答方法について</a></p></header>\
         <form id=\"quiz\" method=\"get\" action=\"/api/rank\">",
        encode_text(region)
    );

    for question in questions {
        let key = question.axis.key();
        let _ = write!(
            body,
            "<fieldset><legend>{}</legend>",
            encode_text(question.text)
        );
        for rating in bounds.min_rating..=bounds.max_rating {
            let checked = if rating == (bounds.min_rating + bounds.max_rating) / 2 {
                " checked"
            } else {
                ""
            };
            let _ = write!(
                body,
                "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}>{}</label>",
                key, rating, checked, rating
            );
        }
        body.push_str("</fieldset>");
    }

    body.push_str("<button type=\"submit\">診断する</button></form><section id=\"results\"></section>");
    body.push_str(RESULTS_SCRIPT);
    page("価値観診断", &body)
}

/// How-to-answer page
pub fn desc_answer_page(bounds: &RatingBounds) -> String {
    let body = format!(
        "<h1>回答方法</h1>\
         <p>それぞれの文章が、あなたにどの程度当てはまるかを {} から {} の数字で選んでください。</p>\
         <p>{} は「まったく当てはまらない」、{} は「非常によく当てはまる」を表します。</p>\
         <p>回答をもとに、価値観が近い企業を上位から表示します。スコアは 0 より大きく 1 以下で、1 に近いほど近い価値観です。</p>\
         <p><a href=\"/\">診断に戻る</a></p>",
        bounds.min_rating, bounds.max_rating, bounds.min_rating, bounds.max_rating
    );
    page("回答方法", &body)
}
