//! Draft session: one draft from generation to a finished map
//!
//! A session is an explicit handle; nothing about an in-flight draft lives
//! in process-wide state. Lifecycle:
//!
//! ```text
//! Idle --start/start_custom--> InProgress --finish--> Finished
//!   \                              |
//!    `----------cancel-------------+--> Cancelled
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::catalog::factions::FactionCatalog;
use crate::catalog::tiles::TileCatalog;
use crate::core::config::DraftConfig;
use crate::core::error::{DraftError, Result};
use crate::core::types::{DraftId, TileId};
use crate::draft::custom::{default_label, CustomDraft};
use crate::generation::factions::FactionGenerator;
use crate::generation::fixed::FixedSystemsGenerator;
use crate::generation::slices::{Slice, SliceGenerator};
use crate::layout::shape::ShapeTable;
use crate::layout::slice_layout::{PlayerSlice, SliceLayout};
use crate::map::assignment::MapAssignment;
use crate::map::hex::HexCoord;
use crate::map::seats::SeatGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Idle,
    InProgress,
    Finished,
    Cancelled,
}

/// What one seat has picked so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeatPick {
    pub slice: Option<usize>,
    pub faction: Option<String>,
}

/// A seat's part of the finished map
#[derive(Debug, Clone, Serialize)]
pub struct SeatAssignment {
    pub seat: usize,
    pub slice: usize,
    pub label: String,
    pub tiles: Vec<TileId>,
    pub faction: Option<String>,
    pub home: HexCoord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftOutcome {
    pub id: DraftId,
    pub map: MapAssignment,
    pub map_string: String,
    pub seats: Vec<SeatAssignment>,
    pub fixed: Vec<(HexCoord, TileId)>,
}

/// RNG for a draft: the configured seed, or a random one
pub fn draft_rng(config: &DraftConfig) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(config.seed.unwrap_or_else(rand::random))
}

pub struct DraftSession<'a> {
    id: DraftId,
    tiles: &'a dyn TileCatalog,
    factions: &'a FactionCatalog,
    config: DraftConfig,
    shapes: ShapeTable,
    state: DraftState,
    slices: Vec<Slice>,
    labels: Vec<String>,
    fixed: Vec<TileId>,
    faction_pool: Vec<String>,
    table: Vec<TileId>,
    picks: Vec<SeatPick>,
    attempts: u32,
}

impl<'a> DraftSession<'a> {
    /// Validate the configuration and resolve the shape table
    pub fn new(
        tiles: &'a dyn TileCatalog,
        factions: &'a FactionCatalog,
        config: DraftConfig,
    ) -> Result<Self> {
        config.check()?;
        let shapes = config
            .variant
            .shape_table(config.player_count, &config.seat_overrides);
        let shape_errors = shapes.validate(config.player_count);
        if !shape_errors.is_empty() {
            return Err(DraftError::InvalidConfig(shape_errors));
        }

        Ok(Self {
            id: DraftId::new(),
            tiles,
            factions,
            picks: vec![SeatPick::default(); config.player_count],
            config,
            shapes,
            state: DraftState::Idle,
            slices: Vec::new(),
            labels: Vec::new(),
            fixed: Vec::new(),
            faction_pool: Vec::new(),
            table: Vec::new(),
            attempts: 0,
        })
    }

    /// Tiles already in play outside the draft. With
    /// `factions.seed_from_table`, factions whose home system is among them
    /// lead the offer.
    pub fn with_table(mut self, table: Vec<TileId>) -> Self {
        self.table = table;
        self
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn fixed(&self) -> &[TileId] {
        &self.fixed
    }

    pub fn faction_pool(&self) -> &[String] {
        &self.faction_pool
    }

    pub fn picks(&self) -> &[SeatPick] {
        &self.picks
    }

    /// Slice batches drawn by the last generation
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn label(&self, slice: usize) -> String {
        self.labels
            .get(slice)
            .cloned()
            .unwrap_or_else(|| default_label(slice))
    }

    fn require(&self, state: DraftState, action: &str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(DraftError::InvalidState(format!(
                "cannot {} a {:?} draft",
                action, self.state
            )))
        }
    }

    /// Generate slices, fixed systems and the faction offer
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.require(DraftState::Idle, "start")?;

        let slice_generator = SliceGenerator::new(self.tiles, &self.config);
        let fixed_generator = FixedSystemsGenerator::new(self.tiles, &self.config);
        slice_generator.check_feasible()?;
        fixed_generator.check_feasible(&slice_generator.requirements())?;
        let mut attempts = 0;
        let mut drawn = None;
        for round in 1..=self.config.draft_attempts {
            let generated = slice_generator.generate(rng)?;
            attempts += generated.attempts;
            match fixed_generator.generate(&generated.slices, rng) {
                Ok(fixed) => {
                    drawn = Some((generated.slices, fixed));
                    break;
                }
                Err(e) if e.is_retryable() => {
                    tracing::debug!("Fixed systems failed on round {}, redrawing slices", round);
                }
                Err(e) => return Err(e),
            }
        }
        let Some((slices, fixed)) = drawn else {
            tracing::warn!("Draft generation gave up after {} rounds", self.config.draft_attempts);
            return Err(DraftError::GenerationFailed { attempts });
        };

        let faction_pool = self.generate_factions(&slices, &fixed, rng)?;
        self.slices = slices;
        self.fixed = fixed;
        self.faction_pool = faction_pool;
        self.attempts = attempts;
        self.state = DraftState::InProgress;
        tracing::info!(
            "Draft {:?} started: {} slices, {} fixed systems, {} factions",
            self.id.0,
            self.slices.len(),
            self.fixed.len(),
            self.faction_pool.len()
        );
        Ok(())
    }

    /// Start from a custom configuration string; anything it leaves out is
    /// generated
    pub fn start_custom<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> Result<()> {
        self.require(DraftState::Idle, "start")?;

        let custom = CustomDraft::parse(input).map_err(DraftError::InvalidConfig)?;
        custom
            .validate(self.tiles, self.factions, &self.config)
            .map_err(DraftError::InvalidConfig)?;

        let fixed = if custom.fixed.is_empty() {
            let generator = FixedSystemsGenerator::new(self.tiles, &self.config);
            let mut result = Err(DraftError::GenerationFailed { attempts: 0 });
            for _ in 0..self.config.draft_attempts {
                result = generator.generate(&custom.slices, rng);
                match &result {
                    Err(e) if e.is_retryable() => continue,
                    _ => break,
                }
            }
            result?
        } else {
            custom.fixed.clone()
        };

        let faction_pool = if custom.factions.is_empty() {
            self.generate_factions(&custom.slices, &fixed, rng)?
        } else {
            custom.factions.clone()
        };

        self.labels = (0..custom.slices.len()).map(|i| custom.label(i)).collect();
        self.slices = custom.slices;
        self.fixed = fixed;
        self.faction_pool = faction_pool;
        self.attempts = 0;
        self.state = DraftState::InProgress;
        tracing::info!(
            "Custom draft {:?} started with {} slices",
            self.id.0,
            self.slices.len()
        );
        Ok(())
    }

    fn generate_factions<R: Rng + ?Sized>(
        &self,
        slices: &[Slice],
        fixed: &[TileId],
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let table: Vec<TileId> = self
            .table
            .iter()
            .copied()
            .chain(slices.iter().flat_map(|s| s.tiles().iter().copied()))
            .chain(fixed.iter().copied())
            .collect();
        FactionGenerator::new(self.factions, &self.config).generate(&table, rng)
    }

    fn check_seat(&self, seat: usize) -> Result<()> {
        if seat < self.picks.len() {
            Ok(())
        } else {
            Err(DraftError::InvalidSeat(seat))
        }
    }

    /// Assign slice `slice` to `seat`, replacing any earlier pick
    pub fn pick_slice(&mut self, seat: usize, slice: usize) -> Result<()> {
        self.require(DraftState::InProgress, "pick in")?;
        self.check_seat(seat)?;
        if slice >= self.slices.len() {
            return Err(DraftError::InvalidState(format!(
                "slice {} does not exist ({} slices)",
                slice,
                self.slices.len()
            )));
        }
        if let Some(owner) = self
            .picks
            .iter()
            .position(|p| p.slice == Some(slice))
            .filter(|&owner| owner != seat)
        {
            return Err(DraftError::InvalidState(format!(
                "slice {} already taken by seat {}",
                self.label(slice),
                owner
            )));
        }
        self.picks[seat].slice = Some(slice);
        tracing::debug!("Seat {} picked slice {}", seat, self.label(slice));
        Ok(())
    }

    /// Assign a faction from the offer to `seat`
    pub fn pick_faction(&mut self, seat: usize, nsid: &str) -> Result<()> {
        self.require(DraftState::InProgress, "pick in")?;
        self.check_seat(seat)?;
        if !self.faction_pool.iter().any(|f| f == nsid) {
            return Err(DraftError::UnknownFaction(nsid.to_string()));
        }
        if let Some(owner) = self
            .picks
            .iter()
            .position(|p| p.faction.as_deref() == Some(nsid))
            .filter(|&owner| owner != seat)
        {
            return Err(DraftError::InvalidState(format!(
                "faction {} already taken by seat {}",
                nsid, owner
            )));
        }
        self.picks[seat].faction = Some(nsid.to_string());
        tracing::debug!("Seat {} picked faction {}", seat, nsid);
        Ok(())
    }

    /// Replace slice `index` before layout
    pub fn set_slice(&mut self, index: usize, slice: Slice) -> Result<()> {
        self.require(DraftState::InProgress, "edit")?;
        if index >= self.slices.len() {
            return Err(DraftError::InvalidState(format!(
                "slice {} does not exist ({} slices)",
                index,
                self.slices.len()
            )));
        }
        let body_len = self.shapes.default_shape().body_len();
        if slice.len() != body_len {
            return Err(DraftError::InvalidConfig(vec![format!(
                "slice has {} tiles, expected {}",
                slice.len(),
                body_len
            )]));
        }
        for (i, &tile) in slice.tiles().iter().enumerate() {
            if self.tiles.tile(tile).is_none() {
                return Err(DraftError::UnknownTile(tile));
            }
            let elsewhere = slice.tiles()[..i].contains(&tile)
                || self.fixed.contains(&tile)
                || self
                    .slices
                    .iter()
                    .enumerate()
                    .any(|(j, s)| j != index && s.tiles().contains(&tile));
            if elsewhere {
                return Err(DraftError::InvalidConfig(vec![format!(
                    "tile {} is already on the table",
                    tile
                )]));
            }
        }
        self.slices[index] = slice;
        Ok(())
    }

    /// Abandon the draft
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            DraftState::Idle | DraftState::InProgress => {
                self.state = DraftState::Cancelled;
                tracing::info!("Draft {:?} cancelled", self.id.0);
                Ok(())
            }
            _ => Err(DraftError::InvalidState(format!(
                "cannot cancel a {:?} draft",
                self.state
            ))),
        }
    }

    /// Lay every seat's pick out on the map and close the draft
    pub fn finish(&mut self, seats: &dyn SeatGeometry) -> Result<DraftOutcome> {
        self.require(DraftState::InProgress, "finish")?;
        if seats.player_count() != self.config.player_count {
            return Err(DraftError::InvalidConfig(vec![format!(
                "seat geometry has {} seats, draft has {} players",
                seats.player_count(),
                self.config.player_count
            )]));
        }

        let mut players = Vec::with_capacity(self.picks.len());
        for (seat, pick) in self.picks.iter().enumerate() {
            let slice = pick.slice.ok_or_else(|| {
                DraftError::InvalidState(format!("seat {} has not picked a slice", seat))
            })?;
            let home_tile = match &pick.faction {
                Some(nsid) => self
                    .factions
                    .get(nsid)
                    .ok_or_else(|| DraftError::UnknownFaction(nsid.clone()))?
                    .home_tile,
                None => None,
            };
            players.push(PlayerSlice {
                seat,
                tiles: self.slices[slice].tiles(),
                home_tile,
            });
        }

        let mut map = MapAssignment::new();
        if let Some(center) = self.config.center_tile {
            map.place(HexCoord::ORIGIN, center)?;
        }

        let layout = SliceLayout::new(&self.shapes);
        layout.layout(seats, &players, &mut map)?;

        let positions = self.config.variant.fixed_positions(seats, &self.shapes)?;
        let fixed: Vec<(HexCoord, TileId)> =
            positions.into_iter().zip(self.fixed.iter().copied()).collect();
        for &(hex, tile) in &fixed {
            map.place(hex, tile)?;
        }

        map.fill_empty(seats.map_radius());
        let map_string = map.to_map_string();

        let mut assignments = Vec::with_capacity(players.len());
        for player in &players {
            let slice = self.picks[player.seat].slice.unwrap_or_default();
            assignments.push(SeatAssignment {
                seat: player.seat,
                slice,
                label: self.label(slice),
                tiles: player.tiles.to_vec(),
                faction: self.picks[player.seat].faction.clone(),
                home: layout.anchor(seats, player.seat)?,
            });
        }

        self.state = DraftState::Finished;
        tracing::info!("Draft {:?} finished: {}", self.id.0, map_string);
        Ok(DraftOutcome {
            id: self.id,
            map,
            map_string,
            seats: assignments,
            fixed,
        })
    }
}
