use crate::chess_board::GameState;

/// Counts the leaf positions reachable in exactly `depth` plies.
pub fn perft(game: &mut GameState, depth: u8) -> u64 {
    let flags = game.mate_flags();
    let node_count = count_nodes(game, depth);
    game.restore_mate_flags(flags);
    node_count
}

fn count_nodes(game: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }

    let moves = game.get_valid_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut node_count = 0u64;
    for mv in moves {
        game.make_move(mv);
        node_count += count_nodes(game, depth - 1);
        game.undo_move();
    }
    node_count
}

/// Node count below every legal root move, sorted by move notation.
pub fn perft_divide(game: &mut GameState, depth: u8) -> Vec<(String, u64)> {
    let mut result_moves = Vec::<(String, u64)>::new();
    if depth == 0 {
        return result_moves;
    }

    let flags = game.mate_flags();
    for mv in game.get_valid_moves() {
        game.make_move(mv);
        result_moves.push((mv.get_chess_notation(), count_nodes(game, depth - 1)));
        game.undo_move();
    }
    game.restore_mate_flags(flags);
    result_moves.sort();
    result_moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_board::test_utils::board_from_rows;
    use crate::chess_board::{CastlingRights, Color};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_perft() {
        let mut board = GameState::new();
        assert_eq!(perft(&mut board, 0), 1u64);
        assert_eq!(perft(&mut board, 1), 20u64);
        assert_eq!(perft(&mut board, 2), 400u64);
        assert_eq!(perft(&mut board, 3), 8902u64);
    }

    #[test]
    #[ignore]
    fn test_perft_depth_4() {
        let mut board = GameState::new();
        assert_eq!(perft(&mut board, 4), 197281u64);
    }

    #[test]
    fn test_perft2() {
        // Kiwipete
        let mut board = board_from_rows(
            ["r...k..r", "p.ppqpb.", "bn..pnp.", "...PN...", ".p..P...", "..N..Q.p", "PPPBBPPP", "R...K..R"],
            Color::White,
            CastlingRights::ALL,
        );
        assert_eq!(perft(&mut board, 1), 48);
        assert_eq!(perft(&mut board, 2), 2039);
        assert_eq!(perft(&mut board, 3), 97862);
    }

    #[test]
    fn test_perft3() {
        let mut board = board_from_rows(
            ["........", "..p.....", "...p....", "KP.....r", ".R...p.k", "........", "....P.P.", "........"],
            Color::White,
            CastlingRights::NONE,
        );
        assert_eq!(perft(&mut board, 1), 14);
        assert_eq!(perft(&mut board, 2), 191);
        assert_eq!(perft(&mut board, 3), 2812);
        assert_eq!(perft(&mut board, 4), 43238);
    }

    #[test]
    fn test_perft_pos6() {
        let mut board = board_from_rows(
            ["r....rk.", ".pp.qppp", "p.np.n..", "..b.p.B.", "..B.P.b.", "P.NP.N..", ".PP.QPPP", "R....RK."],
            Color::White,
            CastlingRights::NONE,
        );
        assert_eq!(perft(&mut board, 1), 46u64);
        assert_eq!(perft(&mut board, 2), 2079u64);
    }

    #[test]
    fn test_perft_pos_web() {
        let mut board = board_from_rows(
            ["rnbqkbnr", ".p....p.", "...pp..p", "p.p..p..", ".......P", "..PP.P.N", "PP.NP.P.", "R.BQKB.R"],
            Color::Black,
            CastlingRights { white_king_side: false, ..CastlingRights::ALL },
        );
        assert_eq!(perft(&mut board, 1), 30);
        assert_eq!(perft(&mut board, 2), 784);
        assert_eq!(perft(&mut board, 3), 23151);
    }

    #[test]
    fn test_perft_leaves_state_untouched() {
        let mut board = GameState::new();
        board.play("e2e4");
        board.play("d7d5");
        board.get_valid_moves();
        let before = board.clone();
        perft(&mut board, 3);
        assert_eq!(board, before);
        perft_divide(&mut board, 2);
        assert_eq!(board, before);
    }

    #[test]
    fn test_perft_divide() {
        let mut board = GameState::new();
        let divide = perft_divide(&mut board, 2);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide[0], ("a2a3".to_string(), 20));
        assert!(divide.iter().all(|(_, n)| *n == 20));
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert!(perft_divide(&mut board, 0).is_empty());
    }
}
