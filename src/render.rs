//! HTML rendering of a [`ViewState`] snapshot.
//!
//! Everything here is a pure function of the snapshot; interaction happens
//! through the links and forms the page points back at the server.

use std::fmt::Write;

use crate::models::{trailer_embed_url, trailer_watch_url, Movie, RelatedMovie};
use crate::store::ViewState;

pub const PLACEHOLDER_POSTER: &str = "/placeholder.svg";
pub const GENRE_SEPARATOR: &str = "/";

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="450" viewBox="0 0 300 450"><rect width="300" height="450" fill="#1f2937"/><text x="150" y="225" fill="#9ca3af" font-family="sans-serif" font-size="20" text-anchor="middle">No poster</text></svg>"##;

const STYLE: &str = "body{margin:0;font-family:sans-serif;background:linear-gradient(135deg,#111827,#6b21a8,#a855f7);min-height:100vh;color:#fff}\
nav{display:flex;justify-content:space-between;align-items:center;padding:1rem 2rem;background:#4f46e5}\
nav a.brand{font-size:1.8rem;font-weight:bold;color:#fff;text-decoration:none}\
main{padding:2rem}\
.hero{display:flex;flex-wrap:wrap;gap:2.5rem}\
.poster{width:300px;border-radius:8px}\
.title{text-transform:uppercase;font-size:34px;color:#facc15}\
.genres{display:flex;gap:1rem;flex-wrap:wrap}\
.meta{display:flex;gap:1.5rem;flex-wrap:wrap}\
.related{display:flex;gap:1rem;overflow-x:auto}\
.related a{flex:none;width:150px;color:#e5e7eb;text-decoration:none;text-align:center}\
.related img{width:150px;border-radius:8px}\
.loading{position:fixed;inset:0;background:#000;display:grid;place-items:center}\
.trailer{position:absolute;top:.75rem;left:13%;right:13%;background:#000}\
.trailer iframe{width:100%;aspect-ratio:16/9;border:0}";

pub fn placeholder_svg() -> &'static str {
    PLACEHOLDER_SVG
}

pub fn render_page(state: &ViewState) -> String {
    let mut body = String::new();
    body.push_str(&render_navbar());
    body.push_str("<main>");
    if state.is_loading {
        body.push_str(r#"<div class="loading">Loading...</div>"#);
    }
    if let Some(query) = &state.not_found_query {
        let _ = write!(
            body,
            r#"<p class="not-found">No movie found for "{}"</p>"#,
            escape(query)
        );
    }
    match &state.current_movie {
        Some(movie) => {
            body.push_str(&render_movie(movie));
            body.push_str(&render_recommendations(&state.recommendations));
            if state.is_trailer_visible {
                if let Some(key) = movie.trailer_key() {
                    body.push_str(&render_trailer_overlay(key));
                }
            }
        }
        None if state.not_found_query.is_none() && !state.is_loading => {
            body.push_str(r#"<p class="idle">Search for a movie to get started.</p>"#);
        }
        None => {}
    }
    body.push_str("</main>");

    let title = state
        .current_movie
        .as_ref()
        .map(|m| format!("{} | Reelscout", escape(&m.title)))
        .unwrap_or_else(|| "Reelscout".to_string());
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>"
    )
}

fn render_navbar() -> String {
    // The input is rendered empty on every page, which clears it after a submit.
    r#"<nav><a class="brand" href="/">Reelscout</a><form method="post" action="/search"><input type="text" name="movie" value="" placeholder="Search a movie..."><button type="submit">Search</button></form></nav>"#
        .to_string()
}

fn render_movie(movie: &Movie) -> String {
    let mut out = String::from(r#"<section class="hero">"#);
    let _ = write!(
        out,
        r#"<img class="poster" alt="movie-poster" src="{}">"#,
        escape(&poster_src(movie.poster_url()))
    );
    out.push_str("<div class=\"details\">");
    let _ = write!(
        out,
        r#"<h1 class="title">{}</h1>"#,
        escape(&movie.title.to_uppercase())
    );
    out.push_str(&render_genres(movie));
    out.push_str(&render_meta_row(movie));
    let _ = write!(
        out,
        r#"<div class="overview"><h2>OVERVIEW:</h2><p>{}</p></div>"#,
        escape(&movie.overview)
    );
    if movie.trailer_key().is_some() {
        out.push_str(
            r#"<form method="post" action="/trailer/show"><button class="watch-trailer" type="submit">&#9654; Watch Trailer</button></form>"#,
        );
    }
    out.push_str("</div></section>");
    out
}

fn render_genres(movie: &Movie) -> String {
    let mut out = String::from(r#"<div class="genres">"#);
    let count = movie.genres.len();
    for (index, genre) in movie.genres.iter().enumerate() {
        let _ = write!(out, r#"<span class="genre">{}</span>"#, escape(&genre.name));
        if index + 1 != count {
            let _ = write!(out, r#"<span class="genre-sep">{GENRE_SEPARATOR}</span>"#);
        }
    }
    out.push_str("</div>");
    out
}

fn render_meta_row(movie: &Movie) -> String {
    let language = if movie.original_language.is_empty() {
        "N/A".to_string()
    } else {
        movie.original_language.to_uppercase()
    };
    let release = movie.release_date.as_deref().unwrap_or("N/A");
    let runtime = movie
        .runtime_minutes
        .map(|r| format!("{r} MIN."))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        r#"<div class="meta"><span class="language">Language: {}</span><span class="release">Release: {}</span><span class="runtime">Runtime: {}</span><span class="rating">Rating: {:.1} &#11088;</span></div>"#,
        escape(&language),
        escape(release),
        runtime,
        movie.vote_average
    )
}

fn render_recommendations(related: &[RelatedMovie]) -> String {
    let mut out = String::from(r#"<section><h2>Related Movies</h2><div class="related">"#);
    for movie in related {
        let _ = write!(
            out,
            r#"<a class="related-card" href="/movie/{}"><img alt="{}" src="{}"><p>{}</p></a>"#,
            movie.id,
            escape(&movie.title),
            escape(&poster_src(movie.poster_url())),
            escape(&movie.title)
        );
    }
    out.push_str("</div></section>");
    out
}

fn render_trailer_overlay(key: &str) -> String {
    format!(
        r#"<div class="trailer"><div class="trailer-bar"><span>Playing Trailer</span><form method="post" action="/trailer/hide"><button class="close-trailer" type="submit">&#10005;</button></form></div><iframe src="{}" allow="autoplay; encrypted-media" allowfullscreen></iframe><a href="{}">Open on YouTube</a></div>"#,
        escape(&trailer_embed_url(key)),
        escape(&trailer_watch_url(key))
    )
}

fn poster_src(url: Option<String>) -> String {
    url.unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())
}

pub fn escape(input: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, Video};

    fn movie(genres: &[&str], trailer: bool) -> Movie {
        Movie {
            id: 1726,
            title: "Iron Man".to_string(),
            poster_path: Some("/iron.jpg".to_string()),
            genres: genres
                .iter()
                .enumerate()
                .map(|(i, n)| Genre {
                    id: i as i32,
                    name: n.to_string(),
                })
                .collect(),
            original_language: "en".to_string(),
            release_date: Some("2008-04-30".to_string()),
            runtime_minutes: Some(126),
            vote_average: 7.645,
            overview: "Tony Stark builds a suit.".to_string(),
            videos: if trailer {
                vec![Video {
                    video_type: "Trailer".to_string(),
                    key: "8ugaeA-nMTc".to_string(),
                    site: Some("YouTube".to_string()),
                }]
            } else {
                vec![Video {
                    video_type: "Clip".to_string(),
                    key: "clip".to_string(),
                    site: Some("YouTube".to_string()),
                }]
            },
        }
    }

    fn loaded(movie: Movie) -> ViewState {
        ViewState {
            current_movie: Some(movie),
            ..ViewState::default()
        }
    }

    #[test]
    fn genre_separators_are_one_fewer_than_genres() {
        for n in 0usize..5 {
            let names: Vec<String> = (0..n).map(|i| format!("Genre{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let html = render_page(&loaded(movie(&refs, true)));
            assert_eq!(
                html.matches(r#"class="genre-sep""#).count(),
                n.saturating_sub(1),
                "for {n} genres"
            );
            if n > 0 {
                let last = format!(r#"<span class="genre">Genre{}</span></div>"#, n - 1);
                assert!(html.contains(&last), "separator after last genre");
            }
        }
    }

    #[test]
    fn renders_uppercased_title_and_metadata_row() {
        let html = render_page(&loaded(movie(&["Action"], true)));
        assert!(html.contains(r#"<h1 class="title">IRON MAN</h1>"#));
        assert!(html.contains("Language: EN"));
        assert!(html.contains("Release: 2008-04-30"));
        assert!(html.contains("Runtime: 126 MIN."));
        assert!(html.contains("Rating: 7.6 &#11088;"));
        assert!(html.contains("https://image.tmdb.org/t/p/w500/iron.jpg"));
    }

    #[test]
    fn missing_poster_uses_placeholder() {
        let mut m = movie(&[], false);
        m.poster_path = None;
        let mut state = loaded(m);
        state.recommendations = vec![RelatedMovie {
            id: 5,
            title: "No Art".to_string(),
            poster_path: None,
        }];
        let html = render_page(&state);
        assert_eq!(html.matches(r#"src="/placeholder.svg""#).count(), 2);
    }

    #[test]
    fn no_trailer_hides_watch_button_and_overlay() {
        let mut state = loaded(movie(&["Drama"], false));
        state.is_trailer_visible = true;
        let html = render_page(&state);
        assert!(!html.contains("Watch Trailer"));
        assert!(!html.contains("youtube.com"));
    }

    #[test]
    fn trailer_overlay_only_when_visible() {
        let mut state = loaded(movie(&["Drama"], true));
        let hidden = render_page(&state);
        assert!(hidden.contains("Watch Trailer"));
        assert!(!hidden.contains("Playing Trailer"));

        state.is_trailer_visible = true;
        let shown = render_page(&state);
        assert!(shown.contains("Playing Trailer"));
        assert!(shown.contains("https://www.youtube.com/watch?v=8ugaeA-nMTc"));
        assert!(shown.contains("https://www.youtube.com/embed/8ugaeA-nMTc"));
        assert!(shown.contains(r#"action="/trailer/hide""#));
    }

    #[test]
    fn not_found_message_interpolates_query() {
        let state = ViewState {
            not_found_query: Some("Nonexistent <Film>".to_string()),
            ..ViewState::default()
        };
        let html = render_page(&state);
        assert!(html.contains(r#"No movie found for "Nonexistent &lt;Film&gt;""#));
        assert!(!html.contains("Related Movies"));
    }

    #[test]
    fn recommendation_cards_link_to_their_movie() {
        let mut state = loaded(movie(&[], true));
        state.recommendations = vec![
            RelatedMovie {
                id: 10138,
                title: "Iron Man 2".to_string(),
                poster_path: Some("/im2.jpg".to_string()),
            },
            RelatedMovie {
                id: 24428,
                title: "The Avengers".to_string(),
                poster_path: None,
            },
        ];
        let html = render_page(&state);
        let first = html.find(r#"href="/movie/10138""#).unwrap();
        let second = html.find(r#"href="/movie/24428""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn search_input_is_always_empty() {
        let html = render_page(&ViewState::default());
        assert!(html.contains(r#"name="movie" value="""#));
        assert!(html.contains("Search for a movie"));
    }
}
