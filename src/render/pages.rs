use std::fmt::Write as _;

use anyhow::Result;

use super::views::{MatchEntry, ProfileView};
use super::{escape_html, ordinal, script_json, shell};
use crate::analysis::{AggregateStatistics, BadgeKind, CategoryAggregate, EarnedBadge, BADGES};
use crate::config::settings::SiteSettings;
use crate::database::Profile;

const SECRET_TITLE: &str = "Secret Badge";
const SECRET_DESCRIPTION: &str = "Keep throwing to earn it";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    NotFound,
    Error,
    RatingSystem,
}

impl StaticPage {
    pub const ALL: [StaticPage; 3] = [
        StaticPage::NotFound,
        StaticPage::Error,
        StaticPage::RatingSystem,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            StaticPage::NotFound => "404.html",
            StaticPage::Error => "500.html",
            StaticPage::RatingSystem => "rating-system.html",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StaticPage::NotFound => "Not Found",
            StaticPage::Error => "Error",
            StaticPage::RatingSystem => "Rating System",
        }
    }

    pub fn render(self, site: &SiteSettings) -> String {
        let body = match self {
            StaticPage::NotFound => NOT_FOUND,
            StaticPage::Error => ERROR,
            StaticPage::RatingSystem => RATING_SYSTEM,
        };
        shell(site, Some(self.title()), body, None)
    }
}

const NOT_FOUND: &str = "<h1>Not Found</h1>\n\
<p>There is nothing here. Try the <a href=\"/\">home page</a>.</p>";

const ERROR: &str = "<h1>Error</h1>\n<p>Something went wrong. Please try again later.</p>";

const RATING_SYSTEM: &str = "<h1>Rating System</h1>\n\
<p>The Axe Charts Rating (ACR) compares the points a thrower earned with \
the points that were available.</p>\n\
<ul>\n\
<li>Every throw, target or clutch, makes 5 points available.</li>\n\
<li>Points earned are the scores of every hatchet and big axe throw. A clutch hit earns 7.</li>\n\
<li>ACR = 1000 &times; points earned / points available, rounded to a whole number.</li>\n\
</ul>\n\
<p>A thrower who lands every throw on the bullseye rates 1000. \
Clutch hits can push the rating past 1000.</p>";

pub fn home_page(site: &SiteSettings, profiles: &[Profile]) -> Result<String> {
    let mut body = String::from("<h1>Premier Throwers</h1>\n");
    body.push_str(&table_head(
        None,
        &["Rank", "Name", "Rating", "ACR", "Matches", "Win %", "Average"],
    ));

    for p in profiles {
        body.push_str(&table_row(&[
            p.rank.to_string(),
            format!("<a href=\"{}.html\">{}</a>", p.profile_id, escape_html(&p.name)),
            p.rating.to_string(),
            p.stats.acr.rating.to_string(),
            p.stats.matches.count.to_string(),
            p.stats.matches.win_percent.to_string(),
            p.stats.matches.average_score.to_string(),
        ]));
    }
    body.push_str("</tbody>\n</table>");

    let data = script_json(&serde_json::json!({ "profiles": profiles }))?;
    Ok(shell(site, None, &body, Some(&data)))
}

pub fn profile_page(site: &SiteSettings, view: &ProfileView) -> Result<String> {
    let profile = view.profile;
    let mut body = String::new();

    let _ = writeln!(
        body,
        "<section class=\"profile\">\n\
         <img class=\"profile-image\" src=\"{}\" alt=\"\">\n\
         <h1>{}</h1>\n<p>{}</p>\n<p>Rank {} · Rating {} · ACR {}</p>\n</section>",
        escape_html(&profile.image),
        escape_html(&profile.name),
        escape_html(&profile.about),
        ordinal(profile.rank),
        profile.rating,
        profile.stats.acr.rating
    );

    body.push_str(&badge_list(&profile.badges));
    body.push_str("<h2>Career</h2>\n");
    body.push_str(&stats_tables(&profile.stats));

    body.push_str("<h2>Seasons</h2>\n");
    body.push_str(&table_head(
        None,
        &[
            "#",
            "Season",
            "Date",
            "Season Rank",
            "Playoff Rank",
            "Matches",
            "Average",
            "ACR",
        ],
    ));
    for entry in &view.seasons {
        let s = entry.season;
        body.push_str(&table_row(&[
            entry.order.to_string(),
            escape_html(&s.name),
            escape_html(&s.date),
            rank_text(s.season_rank),
            rank_text(s.playoff_rank),
            s.stats.matches.count.to_string(),
            s.stats.matches.average_score.to_string(),
            s.stats.acr.rating.to_string(),
        ]));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str("<h2>Matches</h2>\n");
    body.push_str(&table_head(
        None,
        &["Match", "Opponent", "Outcome", "Score", "Rounds"],
    ));
    for entry in &view.matches {
        body.push_str(&match_row(entry));
    }
    body.push_str("</tbody>\n</table>");

    let data = script_json(&serde_json::json!({ "profile": view }))?;
    Ok(shell(site, Some(&profile.name), &body, Some(&data)))
}

/// Every badge grouped by kind; secret badges are masked
pub fn badges_page(site: &SiteSettings) -> String {
    let mut body = String::from("<h1>Badges</h1>\n");

    for (kind, heading) in [
        (BadgeKind::Round, "Round"),
        (BadgeKind::Match, "Match"),
        (BadgeKind::Season, "Season"),
        (BadgeKind::Secret, "Secret"),
    ] {
        let _ = writeln!(body, "<h2>{} Badges</h2>\n<ul>", heading);
        for badge in BADGES.iter().filter(|b| b.kind == kind) {
            let (title, description) = if kind == BadgeKind::Secret {
                (SECRET_TITLE, SECRET_DESCRIPTION)
            } else {
                (badge.title, badge.description)
            };
            let _ = writeln!(
                body,
                "<li><strong>{}</strong>: {}</li>",
                escape_html(title),
                escape_html(description)
            );
        }
        body.push_str("</ul>\n");
    }

    shell(site, Some("Badges"), &body, None)
}

/// Opens a table and writes its header row
fn table_head(class: Option<&str>, headers: &[&str]) -> String {
    let mut html = match class {
        Some(class) => format!("<table class=\"{}\">\n<thead><tr>", class),
        None => String::from("<table>\n<thead><tr>"),
    };
    for header in headers {
        let _ = write!(html, "<th>{}</th>", header);
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    html
}

fn table_row(cells: &[String]) -> String {
    let mut html = String::from("<tr>");
    for cell in cells {
        let _ = write!(html, "<td>{}</td>", cell);
    }
    html.push_str("</tr>\n");
    html
}

fn badge_list(badges: &[EarnedBadge]) -> String {
    if badges.is_empty() {
        return String::new();
    }
    let mut html = String::from("<h2>Badges</h2>\n<div class=\"badges\">\n");
    for badge in badges {
        let class = if badge.kind == BadgeKind::Secret { "badge secret" } else { "badge" };
        let _ = writeln!(
            html,
            "<span class=\"{}\" title=\"{}\">{}</span>",
            class,
            escape_html(&badge.description),
            escape_html(&badge.title)
        );
    }
    html.push_str("</div>\n");
    html
}

fn stats_tables(stats: &AggregateStatistics) -> String {
    let m = &stats.matches;
    let mut html = String::from("<table class=\"match-stats\">\n<tbody>\n");
    for (label, value) in [
        ("Matches", m.count.to_string()),
        ("Wins", format!("{} ({}%)", m.win, m.win_percent)),
        ("Losses", format!("{} ({}%)", m.loss, m.loss_percent)),
        ("Overtime Losses", format!("{} ({}%)", m.otl, m.otl_percent)),
        (
            "Wins Without Big Axe",
            format!("{} ({}%)", m.win_without_big_axe, m.win_without_big_axe_percent),
        ),
        ("Average Score", m.average_score.to_string()),
        (
            "Min / Median / Max",
            format!("{} / {} / {}", m.min_score, m.median_score, m.max_score),
        ),
        (
            "ACR",
            format!(
                "{} ({} / {})",
                stats.acr.rating, stats.acr.points_earned, stats.acr.points_available
            ),
        ),
    ] {
        let _ = writeln!(html, "<tr><th>{}</th><td>{}</td></tr>", label, value);
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str(&table_head(Some("category-stats"), &["", "Hatchet", "Big Axe"]));
    let rows: [(&str, fn(&CategoryAggregate) -> String); 9] = [
        ("Rounds", |c| c.round_count.to_string()),
        ("Round Wins", |c| format!("{} ({}%)", c.round_win, c.round_win_percent)),
        ("Round Losses", |c| format!("{} ({}%)", c.round_loss, c.round_loss_percent)),
        ("Round Ties", |c| format!("{} ({}%)", c.round_tie, c.round_tie_percent)),
        ("Score Per Throw", |c| c.score_per_throw.to_string()),
        ("Clutch Calls", |c| format!("{} ({}%)", c.clutch.call, c.clutch.call_percent)),
        ("Clutch Hits", |c| format!("{} ({}%)", c.clutch.hit, c.clutch.hit_percent)),
        ("Clutch EV", |c| c.clutch.ev.to_string()),
        ("Target 5 / 3 / 1 / Drop", |c| {
            format!(
                "{}% / {}% / {}% / {}%",
                c.target.five_percent,
                c.target.three_percent,
                c.target.one_percent,
                c.target.drop_percent
            )
        }),
    ];
    for (label, cell) in rows {
        let _ = writeln!(
            html,
            "<tr><th>{}</th><td>{}</td><td>{}</td></tr>",
            label,
            cell(&stats.hatchet),
            cell(&stats.big_axe)
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn match_row(entry: &MatchEntry) -> String {
    let record = &entry.row.record;
    let opponent = match &entry.opponent {
        Some(o) => format!("<a href=\"{}.html\">{}</a>", o.profile_id, escape_html(o.name)),
        None => format!("#{}", record.opponent_id),
    };
    let rounds: Vec<String> = record
        .rounds
        .iter()
        .map(|r| format!("{}:{}-{}", r.outcome.letter(), r.total, r.opponent_total))
        .collect();

    table_row(&[
        record.match_id.to_string(),
        opponent,
        record.outcome.map(|o| o.as_str()).unwrap_or("").to_string(),
        record.total.to_string(),
        rounds.join(" "),
    ])
}

fn rank_text(rank: i64) -> String {
    if rank > 0 { ordinal(rank) } else { "-".to_string() }
}
