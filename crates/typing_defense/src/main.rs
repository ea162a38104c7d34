fn main() {
    typing_defense::run();
}
