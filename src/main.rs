use core::{
    CareerState, OwnFixtureResult, PendingAction, RatingSimulator, Repository, SeasonEngine,
    SessionStore, format_money, prepare_season, respond_to_offer,
};
use database::{DatabaseLoader, InMemorySessionStore};
use env_logger::Env;
use log::info;
use std::env;

const USER_ID: u64 = 1;
const STARTING_BUDGET: i64 = 25_000_000;

fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let days: u16 = env::var("DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);

    let mut rng = rand::rng();
    let mut store = DatabaseLoader::load(&mut rng);
    let mut sessions = InMemorySessionStore::new();

    // manage a club in the split-zone league, the format with the most going on
    let league = store
        .leagues()?
        .into_iter()
        .find(|l| l.is_split_zones())
        .expect("seed data carries a split-zone league");
    let team = store.teams_in_league(league.id)?[0].clone();

    store.create_career(CareerState::new(USER_ID, team.id, league.id, STARTING_BUDGET))?;
    prepare_season(&mut store, 1, &mut rng)?;

    info!("career started: managing {} in {}", team.name, league.name);

    let simulator = RatingSimulator;

    for _ in 0..days {
        let mut engine = SeasonEngine::new(&mut store, &simulator);

        // a scheduled own fixture blocks the day until it is settled; this
        // headless driver always confirms auto-simulation
        if let Some(fixture) = engine.own_fixture_today(USER_ID)? {
            sessions.set_pending(
                USER_ID,
                Some(PendingAction::ConfirmSimulateOwnFixture {
                    fixture_id: fixture.id,
                }),
            );
        }

        if let Some(PendingAction::ConfirmSimulateOwnFixture { fixture_id }) =
            sessions.pending(USER_ID)
        {
            let line = engine.resolve_own_fixture(
                USER_ID,
                fixture_id,
                OwnFixtureResult::Simulated,
                &mut rng,
            )?;
            println!("{line}");
            sessions.set_pending(USER_ID, None);
        }

        for message in engine.advance_day(USER_ID, &mut rng)? {
            println!("{message}");
        }

        // AI bids that landed today; the driver sells anyone for an
        // eight-figure fee and rejects the rest
        for offer in store.pending_offers_for_team(team.id)? {
            sessions.set_pending(
                USER_ID,
                Some(PendingAction::RespondToOffer { offer_id: offer.id }),
            );

            if let Some(PendingAction::RespondToOffer { offer_id }) = sessions.pending(USER_ID) {
                let accept = offer.amount >= 10_000_000;
                info!(
                    "answering offer {} ({}): accept={}",
                    offer_id,
                    format_money(offer.amount),
                    accept
                );
                println!("{}", respond_to_offer(&mut store, USER_ID, offer_id, accept)?);
                sessions.set_pending(USER_ID, None);
            }
        }
        println!();
    }

    Ok(())
}
