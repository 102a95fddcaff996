use serde::Serialize;
use way_api::{ApiClient, Checkin};
use way_auth::{Session, TokenStore};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CheckinsArgs;
use crate::output::output;

/// Provider-side page-size ceiling.
const MAX_PAGE_LIMIT: u32 = 250;

#[derive(Serialize)]
struct CheckinRow {
    when: String,
    venue: String,
    location: String,
    shout: String,
}

pub async fn handle(
    args: &CheckinsArgs,
    flags: &GlobalFlags,
    config: &way_config::WaypostConfig,
) -> anyhow::Result<()> {
    let session = Session::new(TokenStore::open_default()?);
    let token = session.resolve_token(flags.token.as_deref())?;

    let client = ApiClient::with_endpoints(
        config.api.base_url.clone(),
        config.api.version.clone(),
    )?
    .with_token(token);

    let limit = args
        .limit
        .unwrap_or(config.general.default_limit)
        .min(MAX_PAGE_LIMIT);
    let page = client.self_checkins(limit, args.offset).await?;

    tracing::debug!(
        fetched = page.items.len(),
        total = page.count,
        "check-in page received"
    );

    let rows: Vec<CheckinRow> = page.items.iter().map(to_row).collect();
    output(&rows, flags.format)
}

fn to_row(checkin: &Checkin) -> CheckinRow {
    CheckinRow {
        when: checkin.local_time().format("%Y-%m-%d %H:%M").to_string(),
        venue: checkin.venue_name().to_string(),
        location: checkin
            .venue
            .as_ref()
            .and_then(|venue| venue.location.as_ref())
            .map(way_api::VenueLocation::summary)
            .unwrap_or_default(),
        shout: checkin.shout.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use way_api::{Venue, VenueLocation};

    use super::*;

    #[test]
    fn row_carries_venue_and_local_time() {
        let checkin = Checkin {
            id: "c1".into(),
            created_at: 1_700_000_000,
            timezone_offset: Some(-300),
            shout: Some("back again".into()),
            venue: Some(Venue {
                id: "v1".into(),
                name: "Corner Coffee".into(),
                location: Some(VenueLocation {
                    city: Some("Brooklyn".into()),
                    state: Some("NY".into()),
                    ..Default::default()
                }),
            }),
        };

        let row = to_row(&checkin);
        assert_eq!(row.venue, "Corner Coffee");
        assert_eq!(row.location, "Brooklyn, NY");
        assert_eq!(row.shout, "back again");
        // 2023-11-14T22:13:20Z shifted -05:00.
        assert_eq!(row.when, "2023-11-14 17:13");
    }

    #[test]
    fn venueless_checkin_renders_off_the_grid() {
        let checkin = Checkin {
            id: "c2".into(),
            created_at: 1_700_000_000,
            timezone_offset: None,
            shout: None,
            venue: None,
        };

        let row = to_row(&checkin);
        assert_eq!(row.venue, "(off the grid)");
        assert_eq!(row.location, "");
        assert_eq!(row.shout, "");
    }
}
