mod block;
mod player;
