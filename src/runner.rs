// src/runner.rs
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
};

use crate::{
    classify::TranscriptLine,
    config::options::PipelineOptions,
    error::GameError,
    game::{self, GameResult},
    oracle::{MinutesOracle, TimedOracle},
    progress::Progress,
    store,
    teams::{GameInfo, TeamLookup},
};

/// Everything a batch needs, owned so workers can share it.
pub struct Inputs {
    /// Transcript lines grouped per game, in the order games should come out.
    pub games: Vec<(String, Vec<TranscriptLine>)>,
    pub infos: HashMap<String, GameInfo>,
    pub lineups: Arc<dyn TeamLookup>,
    pub oracle: Arc<dyn MinutesOracle>,
}

impl Inputs {
    /// Group raw transcript lines and index the games table.
    pub fn new(
        lines: Vec<TranscriptLine>,
        games: Vec<GameInfo>,
        lineups: Arc<dyn TeamLookup>,
        oracle: Arc<dyn MinutesOracle>,
    ) -> Self {
        let infos = games.into_iter().map(|g| (g.game_id.clone(), g)).collect();
        Self { games: store::group_by_game(lines), infos, lineups, oracle }
    }
}

/// A game that could not be assembled.
#[derive(Debug)]
pub struct GameFailure {
    pub game_id: String,
    pub error: GameError,
}

/// Successes and failures, each in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<GameResult>,
    pub failures: Vec<GameFailure>,
}

impl RunSummary {
    pub fn event_count(&self) -> usize {
        self.results.iter().map(|r| r.events.len()).sum()
    }
}

struct Shared {
    games: Vec<(String, Vec<TranscriptLine>)>,
    infos: HashMap<String, GameInfo>,
    lineups: Arc<dyn TeamLookup>,
    oracle: Arc<dyn MinutesOracle>,
    opts: PipelineOptions,
}

impl Shared {
    fn process(&self, i: usize) -> Result<GameResult, GameError> {
        let (game_id, lines) = &self.games[i];
        logf!("{game_id}: assembling {} line(s)", lines.len());
        let info = self
            .infos
            .get(game_id)
            .ok_or_else(|| GameError::UnknownGame { game_id: game_id.clone() })?;
        let result = game::assemble(info, lines, self.lineups.as_ref(), self.oracle.as_ref(), &self.opts)?;
        logf!(
            "{game_id}: {} event(s), {} warning(s)",
            result.events.len(),
            result.warnings.len()
        );
        Ok(result)
    }
}

/// Assemble every game. One game's failure never stops the others.
pub fn run(inputs: Inputs, opts: &PipelineOptions, mut progress: Option<&mut dyn Progress>) -> RunSummary {
    let oracle: Arc<dyn MinutesOracle> = match opts.oracle_timeout {
        Some(timeout) => Arc::new(TimedOracle::new(inputs.oracle, timeout)),
        None => inputs.oracle,
    };
    let total = inputs.games.len();
    let shared = Arc::new(Shared {
        games: inputs.games,
        infos: inputs.infos,
        lineups: inputs.lineups,
        oracle,
        opts: opts.clone(),
    });

    if let Some(p) = progress.as_deref_mut() {
        p.begin(total);
    }

    let mut slots: Vec<Option<Result<GameResult, GameError>>> = (0..total).map(|_| None).collect();
    let workers = opts.workers.min(total).max(1);

    if workers == 1 {
        for (i, slot) in slots.iter_mut().enumerate() {
            let result = shared.process(i);
            report(progress.as_deref_mut(), &shared.games[i].0, &result);
            *slot = Some(result);
        }
    } else {
        let counter = Arc::new(AtomicUsize::new(0));
        let (res_tx, res_rx) = mpsc::channel::<(usize, Result<GameResult, GameError>)>();

        for _ in 0..workers {
            let shared = Arc::clone(&shared);
            let idx = Arc::clone(&counter);
            let tx = res_tx.clone();

            thread::spawn(move || loop {
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= shared.games.len() {
                    break;
                }
                let _ = tx.send((i, shared.process(i)));
            });
        }
        drop(res_tx); // main thread is sole receiver now

        for _ in 0..total {
            match res_rx.recv() {
                Ok((i, result)) => {
                    report(progress.as_deref_mut(), &shared.games[i].0, &result);
                    slots[i] = Some(result);
                }
                Err(_) => break, // workers ended early
            }
        }
    }

    let mut summary = RunSummary::default();
    for (i, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(result)) => summary.results.push(result),
            Some(Err(error)) => summary.failures.push(GameFailure { game_id: error.game_id().to_string(), error }),
            None => {
                let game_id = shared.games[i].0.clone();
                loge!("{game_id}: worker stopped before finishing");
                summary.failures.push(GameFailure {
                    error: GameError::WorkerLost { game_id: game_id.clone() },
                    game_id,
                });
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    summary
}

fn report(progress: Option<&mut (dyn Progress + '_)>, game_id: &str, result: &Result<GameResult, GameError>) {
    match result {
        Ok(_) => {
            if let Some(p) = progress {
                p.item_done(game_id);
            }
        }
        Err(e) => {
            loge!("{e}");
            if let Some(p) = progress {
                p.item_failed(game_id, &e.to_string());
            }
        }
    }
}
