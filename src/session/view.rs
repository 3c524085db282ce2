// Text rendering of the tally.

use vote_tally::ranking::rank_candidates;
use vote_tally::report::votes_label;
use vote_tally::{Position, TallyState};

pub const NO_POSITION: &str =
    "Nenhum cargo cadastrado. Use \"position add <nome>\" para adicionar um cargo.";

pub const HELP: &str = "\
Comandos:
  vote <id>                 adiciona um voto ao candidato
  unvote <id>               remove um voto do candidato
  add <nome>                adiciona um candidato ao cargo ativo
  rename <id> <nome>        renomeia um candidato
  delete <id>               exclui um candidato
  reset                     zera os votos do cargo ativo
  position add <nome>       adiciona um cargo e o seleciona
  position rename <nome>    renomeia o cargo ativo
  position select <id>      seleciona um cargo
  position delete <id>      exclui um cargo
  show                      mostra o cargo ativo
  positions                 lista os cargos
  ranking                   mostra o resultado de todos os cargos
  info                      mostra os requisitos do cargo ativo
  report [diretório]        exporta o relatório em PDF
  quit                      encerra";

/// The ranking of the active position, or a placeholder if there is no position.
pub fn render_active(state: &TallyState) -> String {
    match state.active_position() {
        Some(position) => render_position(position),
        None => NO_POSITION.to_string(),
    }
}

pub fn render_position(position: &Position) -> String {
    let total = position.total_votes();
    let mut lines: Vec<String> = vec![format!(
        "== {} [{}] | {} {} ==",
        position.name,
        position.id,
        total,
        votes_label(total)
    )];
    if position.candidates.is_empty() {
        lines.push(
            "  Nenhum candidato adicionado ainda. Use \"add <nome>\" para começar.".to_string(),
        );
    }
    for r in rank_candidates(&position.candidates) {
        let mut line = format!(
            "{} {:>3}  [{}] {:<30} {:>5} {}",
            if r.leading { "*" } else { " " },
            format!("{}º", r.place),
            r.candidate.id,
            r.candidate.name,
            r.candidate.votes,
            votes_label(r.candidate.votes)
        );
        if r.tied {
            line.push_str("  Empate");
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// All the positions, the active one being marked.
pub fn render_positions(state: &TallyState) -> String {
    let total = state.total_votes();
    let mut lines: Vec<String> = vec![format!("Total de votos: {}", total)];
    if state.positions.is_empty() {
        lines.push(NO_POSITION.to_string());
    }
    let active_id = state.active_position().map(|p| p.id.clone());
    for position in state.positions.iter() {
        let marker = if Some(&position.id) == active_id.as_ref() {
            ">"
        } else {
            " "
        };
        let votes = position.total_votes();
        lines.push(format!(
            "{} [{}] {} ({} {})",
            marker,
            position.id,
            position.name,
            votes,
            votes_label(votes)
        ));
    }
    lines.join("\n")
}
