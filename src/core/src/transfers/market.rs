use crate::club::{Player, Team};
use crate::error::{CoreError, CoreResult};
use crate::repository::{Repository, with_transaction};
use crate::shared::format_money;
use crate::transfers::{OfferKind, OfferStatus, TransferOffer, market_value};
use log::debug;
use rand::prelude::*;

/// Outcome of a user bid: the seller either takes the money or turns it down.
#[derive(Debug, Clone)]
pub struct SigningAttempt {
    pub accepted: bool,
    pub message: String,
}

/// The user bids for an AI club's player. Validation happens before any
/// mutation; an accepted bid moves the player and debits the budget in one
/// transaction.
pub fn try_sign_for_user<R: Rng>(
    repo: &mut dyn Repository,
    user_id: u64,
    player_id: u32,
    amount: i64,
    rng: &mut R,
) -> CoreResult<SigningAttempt> {
    let career = repo.career(user_id)?;

    if !career.is_market_open() {
        return Err(CoreError::InvalidInput(String::from(
            "the transfer market is closed right now",
        )));
    }
    if amount <= 0 {
        return Err(CoreError::InvalidInput(String::from(
            "the offer amount must be positive",
        )));
    }

    let player = repo.player(player_id)?;
    let Some(owner_id) = player.team_id else {
        return Err(CoreError::InvalidInput(format!(
            "{} is a free agent, there is no club to buy from",
            player.name
        )));
    };
    if owner_id == career.team_id {
        return Err(CoreError::InvalidInput(format!(
            "{} already plays for your club",
            player.name
        )));
    }
    if amount > career.budget {
        return Err(CoreError::InvalidInput(format!(
            "your club has {} and the bid is {}",
            format_money(career.budget),
            format_money(amount)
        )));
    }

    let seller = repo.team(owner_id)?;
    let value = market_value(&player, rng);
    let ratio = amount as f64 / value as f64;
    let acceptance = if ratio >= 1.5 {
        0.95
    } else if ratio >= 1.2 {
        0.75
    } else if ratio >= 1.05 {
        0.5
    } else {
        0.15
    };

    if rng.random_bool(acceptance) {
        let buyer_id = career.team_id;
        let new_budget = career.budget - amount;
        with_transaction(repo, |repo| {
            repo.set_career_budget(user_id, new_budget)?;
            repo.transfer_player(player_id, buyer_id)
        })?;

        Ok(SigningAttempt {
            accepted: true,
            message: format!(
                "✅ **{}** ({} rating {}) is yours! **{}** accepted **{}**. Budget left: **{}**.",
                player.name,
                player.position.short(),
                player.rating,
                seller.name,
                format_money(amount),
                format_money(new_budget)
            ),
        })
    } else {
        Ok(SigningAttempt {
            accepted: false,
            message: format!(
                "❌ **{}** turned down your **{}** bid for **{}**. Raise it or look elsewhere.",
                seller.name,
                format_money(amount),
                player.name
            ),
        })
    }
}

/// An AI club from the user's league bids for one of the user's players
/// (rating below 85 only). Returns the pending offer id plus the breaking
/// news line, or `None` when no candidate or bidder exists.
pub fn generate_ai_offer<R: Rng>(
    repo: &mut dyn Repository,
    user_id: u64,
    rng: &mut R,
) -> CoreResult<Option<(u32, String)>> {
    let career = repo.career(user_id)?;

    let squad = repo.players_in_team(career.team_id)?;
    let candidates: Vec<&Player> = squad.iter().filter(|p| p.rating < 85).collect();
    let Some(player) = candidates.choose(rng) else {
        return Ok(None);
    };

    let bidders: Vec<Team> = repo
        .teams_in_league(career.league_id)?
        .into_iter()
        .filter(|t| t.id != career.team_id)
        .collect();
    let Some(bidder) = bidders.choose(rng) else {
        return Ok(None);
    };

    let value = market_value(player, rng);
    let amount = ((value as f64 * rng.random_range(0.7..0.95)) as i64).max(100_000);

    let offer_id = repo.save_offer(TransferOffer {
        id: 0,
        player_id: player.id,
        bidder_team_id: bidder.id,
        owner_team_id: career.team_id,
        amount,
        kind: OfferKind::AiBuysFromUser,
        status: OfferStatus::Pending,
    })?;

    let message = format!(
        "📰 BREAKING: **{}** bid **{}** for **{}** ({} rating {}). Offer #{} awaits your answer.",
        bidder.name,
        format_money(amount),
        player.name,
        player.position.short(),
        player.rating,
        offer_id
    );
    Ok(Some((offer_id, message)))
}

/// The user answers a pending AI offer for one of their players.
pub fn respond_to_offer(
    repo: &mut dyn Repository,
    user_id: u64,
    offer_id: u32,
    accept: bool,
) -> CoreResult<String> {
    let career = repo.career(user_id)?;
    let offer = repo.offer(offer_id)?;

    if offer.owner_team_id != career.team_id || offer.status != OfferStatus::Pending {
        return Err(CoreError::InvalidInput(format!(
            "offer {offer_id} is not pending for your club"
        )));
    }

    let player = repo.player(offer.player_id)?;
    if player.team_id != Some(career.team_id) {
        return Err(CoreError::InvalidInput(format!(
            "{} is no longer in your squad",
            player.name
        )));
    }

    let bidder = repo.team(offer.bidder_team_id)?;

    if accept {
        let new_budget = career.budget + offer.amount;
        with_transaction(repo, |repo| {
            repo.transfer_player(offer.player_id, offer.bidder_team_id)?;
            repo.set_career_budget(user_id, new_budget)?;
            repo.set_offer_status(offer_id, OfferStatus::Accepted)
        })?;

        Ok(format!(
            "✅ Sold! **{}** joins **{}** for **{}**. Budget: **{}**.",
            player.name,
            bidder.name,
            format_money(offer.amount),
            format_money(new_budget)
        ))
    } else {
        repo.set_offer_status(offer_id, OfferStatus::Rejected)?;
        Ok(format!(
            "❌ You turned down **{}**'s **{}** bid for **{}**.",
            bidder.name,
            format_money(offer.amount),
            player.name
        ))
    }
}

/// AI-to-AI churn inside one league for one market day. The excluded team
/// (the user's club) never appears on either side of a deal. Returns the
/// transfer news lines.
pub fn simulate_ai_transfers<R: Rng>(
    repo: &mut dyn Repository,
    league_id: u32,
    excluded_team: Option<u32>,
    rng: &mut R,
) -> CoreResult<Vec<String>> {
    let mut news = Vec::new();

    // most market days pass quietly
    if !rng.random_bool(0.15) {
        return Ok(news);
    }

    let mut teams: Vec<Team> = repo
        .teams_in_league(league_id)?
        .into_iter()
        .filter(|t| Some(t.id) != excluded_team)
        .collect();
    if teams.len() < 2 {
        return Ok(news);
    }
    teams.shuffle(rng);

    for buyer in &teams {
        if !rng.random_bool(0.3) {
            continue;
        }

        let mut target: Option<(Player, Team)> = None;
        for _ in 0..5 {
            let sellers: Vec<&Team> = teams.iter().filter(|t| t.id != buyer.id).collect();
            let Some(seller) = sellers.choose(rng) else {
                break;
            };
            let squad = repo.players_in_team(seller.id)?;
            let Some(player) = squad.choose(rng) else {
                continue;
            };

            // clubs hang on to players clearly above their own level
            if player.rating > seller.rating.saturating_add(5) && !rng.random_bool(0.3) {
                continue;
            }

            target = Some((player.clone(), (*seller).clone()));
            break;
        }

        let Some((player, seller)) = target else {
            continue;
        };

        let value = market_value(&player, rng);
        let bid = (value as f64 * rng.random_range(0.8..1.3)) as i64;
        let ratio = bid as f64 / value as f64;
        let acceptance = if ratio >= 1.2 {
            0.9
        } else if ratio >= 1.0 {
            0.6
        } else if ratio >= 0.9 {
            0.3
        } else {
            0.1
        };

        if rng.random_bool(acceptance) {
            repo.transfer_player(player.id, buyer.id)?;
            news.push(format!(
                "💥 MARKET BOMBSHELL: **{}** signed **{}** ({} rating {}) from **{}** for **{}**.",
                buyer.name,
                player.name,
                player.position.short(),
                player.rating,
                seller.name,
                format_money(bid)
            ));
        } else {
            debug!(
                "{} turned down {}'s bid for {}",
                seller.name, buyer.name, player.name
            );
        }
    }

    Ok(news)
}
