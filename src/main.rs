fn main() {
    terminal_chess::mock::run_interactive_terminal();
}
